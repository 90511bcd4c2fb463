//! bimgltf binary entry point

fn main() -> anyhow::Result<()> {
    bimgltf::cli::run_cli()
}
