use serde::{Deserialize, Serialize};

use crate::core::{InvalidShapeDefinition, ShapeMatrix};

/// Declarative form of a shape, as written in a shape file.
///
/// ```json
/// { "name": "T", "rows": ["010", "111", "000"] }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShapeDefinition {
    pub name: String,
    pub rows: Vec<String>,
}

impl ShapeDefinition {
    #[must_use]
    pub fn new(name: impl Into<String>, rows: &[&str]) -> Self {
        Self {
            name: name.into(),
            rows: rows.iter().map(|&r| r.to_owned()).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum CatalogError {
    #[display("shape catalog is empty")]
    Empty,
    #[display("invalid shape {name:?}: {source}")]
    InvalidShape {
        name: String,
        source: InvalidShapeDefinition,
    },
}

/// A named, validated shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogShape {
    name: String,
    matrix: ShapeMatrix,
}

impl CatalogShape {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn matrix(&self) -> &ShapeMatrix {
        &self.matrix
    }
}

const STANDARD_SHAPES: [(&str, &[&str]); 7] = [
    ("I", &["0000", "1111", "0000", "0000"]),
    ("O", &["11", "11"]),
    ("S", &["011", "110", "000"]),
    ("Z", &["110", "011", "000"]),
    ("J", &["100", "111", "000"]),
    ("L", &["001", "111", "000"]),
    ("T", &["010", "111", "000"]),
];

/// The set of shapes a session can spawn.
///
/// Every shape is validated once, when the catalog is built, so that a malformed
/// declaration stops the game before it starts. The catalog is never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapeCatalog {
    shapes: Vec<CatalogShape>,
}

impl ShapeCatalog {
    pub fn from_definitions<'a, I>(definitions: I, max_size: usize) -> Result<Self, CatalogError>
    where
        I: IntoIterator<Item = &'a ShapeDefinition>,
    {
        let shapes = definitions
            .into_iter()
            .map(|def| {
                let matrix = ShapeMatrix::from_rows(def.rows.as_slice(), max_size).map_err(
                    |source| CatalogError::InvalidShape {
                        name: def.name.clone(),
                        source,
                    },
                )?;
                Ok(CatalogShape {
                    name: def.name.clone(),
                    matrix,
                })
            })
            .collect::<Result<Vec<_>, CatalogError>>()?;
        if shapes.is_empty() {
            return Err(CatalogError::Empty);
        }
        Ok(Self { shapes })
    }

    /// The seven tetrominoes. Requires `max_size >= 4`.
    pub fn standard(max_size: usize) -> Result<Self, CatalogError> {
        Self::from_definitions(&Self::standard_definitions(), max_size)
    }

    #[must_use]
    pub fn standard_definitions() -> Vec<ShapeDefinition> {
        STANDARD_SHAPES
            .iter()
            .map(|(name, rows)| ShapeDefinition::new(*name, rows))
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Returns the shape at `index`, wrapping around the catalog length.
    #[must_use]
    pub fn shape(&self, index: usize) -> &CatalogShape {
        &self.shapes[index % self.shapes.len()]
    }

    pub fn iter(&self) -> impl Iterator<Item = &CatalogShape> + '_ {
        self.shapes.iter()
    }

    /// Size of the largest shape in the catalog.
    #[must_use]
    pub fn max_shape_size(&self) -> usize {
        self.shapes
            .iter()
            .map(|s| s.matrix.size())
            .max()
            .unwrap_or(0)
    }
}
