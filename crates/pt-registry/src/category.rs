//! Component categories and what each one takes part in.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    Source,
    PropulsiveLoad,
    Propulsor,
    Connector,
    Storage,
    Tank,
}

/// The three artifacts the model-builder instantiates per component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    Sizing,
    Performance,
    Slipstream,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Source,
        Category::PropulsiveLoad,
        Category::Propulsor,
        Category::Connector,
        Category::Storage,
        Category::Tank,
    ];

    /// Namespace segment used in promoted variable names.
    pub fn namespace(self) -> &'static str {
        match self {
            Category::Source => "source",
            Category::PropulsiveLoad => "propulsive_load",
            Category::Propulsor => "propulsor",
            Category::Connector => "connector",
            Category::Storage => "storage",
            Category::Tank => "tank",
        }
    }

    /// Whether members of this category may sit in a performance loop.
    ///
    /// Electrical loops close through buses, storage and sources; a loop through
    /// a propulsor, a propulsive load or a tank has no physical meaning.
    pub fn allows_cycles(self) -> bool {
        matches!(
            self,
            Category::Connector | Category::Storage | Category::Source
        )
    }

    pub fn participates_in(self, artifact: ArtifactKind) -> bool {
        match artifact {
            ArtifactKind::Sizing | ArtifactKind::Performance => true,
            ArtifactKind::Slipstream => matches!(self, Category::Propulsor),
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.namespace())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycle_categories() {
        let allowed: Vec<Category> = Category::ALL
            .into_iter()
            .filter(|c| c.allows_cycles())
            .collect();
        assert_eq!(
            allowed,
            [Category::Source, Category::Connector, Category::Storage]
        );
    }

    #[test]
    fn only_propulsors_have_slipstream() {
        for c in Category::ALL {
            assert_eq!(
                c.participates_in(ArtifactKind::Slipstream),
                c == Category::Propulsor
            );
            assert!(c.participates_in(ArtifactKind::Sizing));
        }
    }
}
