//! Material registry: appearance colors → named PBR material records.

use indexmap::IndexMap;

use crate::shape::Appearance;

/// Registry key returned for objects without a usable appearance.
pub const DEFAULT_MATERIAL_KEY: &str = "default";

/// A PBR metallic-roughness material record.
#[derive(Debug, Clone)]
pub struct MaterialRecord {
    /// Unique material name.
    pub name: String,
    /// Base color, RGBA.
    pub base_color_factor: [f32; 4],
    /// Metallic factor.
    pub metallic_factor: f32,
    /// Roughness factor.
    pub roughness_factor: f32,
}

impl MaterialRecord {
    /// The fixed default material: light gray, non-metallic, mostly rough.
    #[must_use]
    pub fn default_record() -> Self {
        Self {
            name: "Default".to_string(),
            base_color_factor: [0.8, 0.8, 0.8, 1.0],
            metallic_factor: 0.0,
            roughness_factor: 0.9,
        }
    }
}

/// Insertion-ordered registry of materials keyed by name.
///
/// Appearance colors are never deduplicated by value: each object with an
/// appearance gets its own sequentially numbered record.
#[derive(Debug, Default)]
pub struct MaterialRegistry {
    materials: IndexMap<String, MaterialRecord>,
}

impl MaterialRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve the appearances of one scene object to a material key.
    ///
    /// The first appearance with at least 4 color components becomes a new
    /// `Material_<n>` record (`n` counts from the registry size at insertion
    /// time). Without a usable appearance the `"default"` key is returned,
    /// inserting the fixed default record on first use.
    pub fn resolve(&mut self, appearances: &[Appearance]) -> String {
        for appearance in appearances {
            let c = &appearance.color_rgba;
            if c.len() >= 4 {
                let name = format!("Material_{}", self.materials.len() + 1);
                self.materials.insert(
                    name.clone(),
                    MaterialRecord {
                        name: name.clone(),
                        base_color_factor: [c[0], c[1], c[2], c[3]],
                        metallic_factor: 0.0,
                        roughness_factor: 0.9,
                    },
                );
                return name;
            }
        }

        self.materials
            .entry(DEFAULT_MATERIAL_KEY.to_string())
            .or_insert_with(MaterialRecord::default_record);
        DEFAULT_MATERIAL_KEY.to_string()
    }

    /// Position of a material key in insertion order, 0 when absent.
    #[must_use]
    pub fn index_of(&self, key: &str) -> usize {
        self.materials.get_index_of(key).unwrap_or(0)
    }

    /// Records in insertion order.
    pub fn records(&self) -> impl Iterator<Item = &MaterialRecord> {
        self.materials.values()
    }

    /// Number of registered materials.
    #[must_use]
    pub fn len(&self) -> usize {
        self.materials.len()
    }

    /// True when no material has been registered yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }
}
