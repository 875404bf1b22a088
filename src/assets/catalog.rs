use serde::{Deserialize, Serialize};

/// Decorative sprite categories.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SpriteKind {
    Tree,
    Flower,
    FlowerBed,
}

impl SpriteKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Tree => "tree",
            Self::Flower => "flower",
            Self::FlowerBed => "flower-bed",
        }
    }
}

/// Candidate image paths per sprite category, relative to the asset root.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct AssetCatalog {
    pub trees: Vec<String>,
    pub flowers: Vec<String>,
    #[serde(alias = "flowerbeds")]
    pub flower_beds: Vec<String>,
}

impl Default for AssetCatalog {
    fn default() -> Self {
        Self {
            trees: vec![
                "resources/tree.png".to_string(),
                "resources/tree2.png".to_string(),
            ],
            flowers: (1..=16)
                .map(|i| format!("resources/flower{i}.png"))
                .collect(),
            flower_beds: (1..=8)
                .map(|i| format!("resources/flowerbed{i}.png"))
                .collect(),
        }
    }
}

impl AssetCatalog {
    pub fn candidates(&self, kind: SpriteKind) -> &[String] {
        match kind {
            SpriteKind::Tree => &self.trees,
            SpriteKind::Flower => &self.flowers,
            SpriteKind::FlowerBed => &self.flower_beds,
        }
    }
}
