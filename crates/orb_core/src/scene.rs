//! Scene file records.
//!
//! A scene file holds one sphere per line:
//!
//! ```text
//! x,y,z,radius,Diffuse,r,g,b
//! x,y,z,radius,Metallic,r,g,b,fuzz
//! x,y,z,radius,Dielectric,refractive_index
//! ```
//!
//! Blank lines and lines starting with `#` are ignored. Any malformed record
//! fails the whole load with the offending line number; nothing defaults to
//! zero.

use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

use orb_math::Vec3;
use thiserror::Error;

/// Errors in a single scene record.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RecordError {
    #[error("expected {expected} fields for {kind}, found {found}")]
    FieldCount {
        kind: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("unknown material kind '{0}' (expected Diffuse, Metallic or Dielectric)")]
    UnknownMaterial(String),

    #[error("field '{field}' is not a number: '{value}'")]
    InvalidNumber { field: &'static str, value: String },

    #[error("field '{0}' must be finite")]
    NonFinite(&'static str),

    #[error("refractive index must be positive, got {0}")]
    InvalidRefractiveIndex(f32),
}

/// Errors that can occur while loading or saving a scene file.
#[derive(Error, Debug)]
pub enum SceneError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error at line {line}: {source}")]
    Parse { line: usize, source: RecordError },
}

/// Result type for scene operations.
pub type SceneResult<T> = Result<T, SceneError>;

/// Surface description attached to a sphere record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MaterialRecord {
    /// Lambertian surface with the given albedo.
    Diffuse { albedo: Vec3 },
    /// Reflective surface; `fuzz` roughens the reflection.
    Metallic { albedo: Vec3, fuzz: f32 },
    /// Clear refractive surface (glass, water).
    Dielectric { refractive_index: f32 },
}

impl MaterialRecord {
    /// Keyword used in scene files.
    pub fn kind(&self) -> &'static str {
        match self {
            MaterialRecord::Diffuse { .. } => "Diffuse",
            MaterialRecord::Metallic { .. } => "Metallic",
            MaterialRecord::Dielectric { .. } => "Dielectric",
        }
    }
}

/// One sphere from a scene file.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphereRecord {
    pub center: Vec3,
    /// Negative radii are allowed and turn the sphere inside out.
    pub radius: f32,
    pub material: MaterialRecord,
}

impl SphereRecord {
    pub fn new(center: Vec3, radius: f32, material: MaterialRecord) -> Self {
        Self {
            center,
            radius,
            material,
        }
    }
}

const GEOMETRY_FIELDS: usize = 5;

fn field(fields: &[&str], index: usize, name: &'static str) -> Result<f32, RecordError> {
    let raw = fields[index];
    let value: f32 = raw.parse().map_err(|_| RecordError::InvalidNumber {
        field: name,
        value: raw.to_string(),
    })?;
    if !value.is_finite() {
        return Err(RecordError::NonFinite(name));
    }
    Ok(value)
}

fn expect_fields(fields: &[&str], kind: &'static str, params: usize) -> Result<(), RecordError> {
    let expected = GEOMETRY_FIELDS + params;
    if fields.len() != expected {
        return Err(RecordError::FieldCount {
            kind,
            expected,
            found: fields.len(),
        });
    }
    Ok(())
}

impl FromStr for SphereRecord {
    type Err = RecordError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        if fields.len() < GEOMETRY_FIELDS {
            return Err(RecordError::FieldCount {
                kind: "a sphere",
                expected: GEOMETRY_FIELDS,
                found: fields.len(),
            });
        }

        let center = Vec3::new(
            field(&fields, 0, "x")?,
            field(&fields, 1, "y")?,
            field(&fields, 2, "z")?,
        );
        let radius = field(&fields, 3, "radius")?;

        let material = match fields[4] {
            "Diffuse" => {
                expect_fields(&fields, "Diffuse", 3)?;
                MaterialRecord::Diffuse {
                    albedo: Vec3::new(
                        field(&fields, 5, "r")?,
                        field(&fields, 6, "g")?,
                        field(&fields, 7, "b")?,
                    ),
                }
            }
            "Metallic" => {
                expect_fields(&fields, "Metallic", 4)?;
                MaterialRecord::Metallic {
                    albedo: Vec3::new(
                        field(&fields, 5, "r")?,
                        field(&fields, 6, "g")?,
                        field(&fields, 7, "b")?,
                    ),
                    fuzz: field(&fields, 8, "fuzz")?,
                }
            }
            "Dielectric" => {
                expect_fields(&fields, "Dielectric", 1)?;
                let refractive_index = field(&fields, 5, "refractive_index")?;
                if refractive_index <= 0.0 {
                    return Err(RecordError::InvalidRefractiveIndex(refractive_index));
                }
                MaterialRecord::Dielectric { refractive_index }
            }
            other => return Err(RecordError::UnknownMaterial(other.to_string())),
        };

        Ok(SphereRecord::new(center, radius, material))
    }
}

impl fmt::Display for SphereRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = self.center;
        write!(f, "{},{},{},{},{}", c.x, c.y, c.z, self.radius, self.material.kind())?;
        match self.material {
            MaterialRecord::Diffuse { albedo } => {
                write!(f, ",{},{},{}", albedo.x, albedo.y, albedo.z)
            }
            MaterialRecord::Metallic { albedo, fuzz } => {
                write!(f, ",{},{},{},{}", albedo.x, albedo.y, albedo.z, fuzz)
            }
            MaterialRecord::Dielectric { refractive_index } => write!(f, ",{}", refractive_index),
        }
    }
}

/// Parse scene file contents.
pub fn parse_scene(content: &str) -> SceneResult<Vec<SphereRecord>> {
    let mut records = Vec::new();

    for (index, line) in content.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let record = trimmed.parse().map_err(|source| SceneError::Parse {
            line: index + 1,
            source,
        })?;
        records.push(record);
    }

    Ok(records)
}

/// Load a scene file from disk.
pub fn load_scene(path: impl AsRef<Path>) -> SceneResult<Vec<SphereRecord>> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)?;
    let records = parse_scene(&content)?;
    log::debug!("Loaded {} sphere records from {}", records.len(), path.display());
    Ok(records)
}

/// Write records in scene file format, one per line.
pub fn write_scene<W: Write>(mut writer: W, records: &[SphereRecord]) -> std::io::Result<()> {
    for record in records {
        writeln!(writer, "{}", record)?;
    }
    writer.flush()
}

/// Save records to a scene file on disk.
pub fn save_scene(path: impl AsRef<Path>, records: &[SphereRecord]) -> SceneResult<()> {
    let file = File::create(path.as_ref())?;
    write_scene(BufWriter::new(file), records)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_all_material_kinds() {
        let content = "\
0,0,-1,0.5,Diffuse,0.1,0.2,0.5
1, 0, -1, 0.5, Metallic, 0.8, 0.6, 0.2, 0.3
-1,0,-1,-0.45,Dielectric,1.5
";
        let records = parse_scene(content).unwrap();
        assert_eq!(records.len(), 3);

        assert_eq!(records[0].center, Vec3::new(0.0, 0.0, -1.0));
        assert_eq!(
            records[0].material,
            MaterialRecord::Diffuse {
                albedo: Vec3::new(0.1, 0.2, 0.5)
            }
        );
        assert_eq!(
            records[1].material,
            MaterialRecord::Metallic {
                albedo: Vec3::new(0.8, 0.6, 0.2),
                fuzz: 0.3
            }
        );
        assert_eq!(records[2].radius, -0.45);
        assert_eq!(
            records[2].material,
            MaterialRecord::Dielectric {
                refractive_index: 1.5
            }
        );
    }

    #[test]
    fn test_parse_skips_blank_and_comment_lines() {
        let content = "# ground\n\n0,-100.5,-1,100,Diffuse,0.8,0.8,0\n   \n";
        let records = parse_scene(content).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].radius, 100.0);
    }

    #[test]
    fn test_parse_error_reports_line() {
        let content = "0,0,-1,0.5,Diffuse,0.1,0.2,0.5\n\n0,0,abc,0.5,Diffuse,0.1,0.2,0.5\n";
        match parse_scene(content) {
            Err(SceneError::Parse { line, source }) => {
                assert_eq!(line, 3);
                assert_eq!(
                    source,
                    RecordError::InvalidNumber {
                        field: "z",
                        value: "abc".to_string()
                    }
                );
            }
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_rejects_unknown_material() {
        let err = "0,0,0,1,Plastic,1,1,1".parse::<SphereRecord>().unwrap_err();
        assert_eq!(err, RecordError::UnknownMaterial("Plastic".to_string()));
    }

    #[test]
    fn test_parse_rejects_wrong_field_count() {
        let err = "0,0,0,1,Metallic,1,1,1".parse::<SphereRecord>().unwrap_err();
        assert_eq!(
            err,
            RecordError::FieldCount {
                kind: "Metallic",
                expected: 9,
                found: 8
            }
        );

        assert!(matches!(
            "0,0,0".parse::<SphereRecord>(),
            Err(RecordError::FieldCount { found: 3, .. })
        ));
    }

    #[test]
    fn test_parse_rejects_non_finite_and_bad_ior() {
        assert_eq!(
            "0,0,0,inf,Dielectric,1.5".parse::<SphereRecord>().unwrap_err(),
            RecordError::NonFinite("radius")
        );
        assert_eq!(
            "0,0,0,1,Dielectric,0".parse::<SphereRecord>().unwrap_err(),
            RecordError::InvalidRefractiveIndex(0.0)
        );
    }

    #[test]
    fn test_write_then_parse_reproduces_records() {
        let records = vec![
            SphereRecord::new(
                Vec3::new(0.123_456_7, -1000.0, 3.5),
                1000.0,
                MaterialRecord::Diffuse {
                    albedo: Vec3::new(0.5, 0.25, 0.125),
                },
            ),
            SphereRecord::new(
                Vec3::new(4.0, 1.0, 0.0),
                1.0,
                MaterialRecord::Metallic {
                    albedo: Vec3::new(0.7, 0.6, 0.5),
                    fuzz: 0.0,
                },
            ),
            SphereRecord::new(
                Vec3::new(-1.0, 0.0, -1.0),
                -0.45,
                MaterialRecord::Dielectric {
                    refractive_index: 1.5,
                },
            ),
        ];

        let mut buffer = Vec::new();
        write_scene(&mut buffer, &records).unwrap();
        let text = String::from_utf8(buffer).unwrap();

        assert_eq!(text.lines().count(), 3);
        assert_eq!(parse_scene(&text).unwrap(), records);
    }

    #[test]
    fn test_save_and_load_scene_file() {
        let path = std::env::temp_dir().join(format!("orb_scene_{}.csv", std::process::id()));
        let records = vec![SphereRecord::new(
            Vec3::ZERO,
            0.5,
            MaterialRecord::Dielectric {
                refractive_index: 1.33,
            },
        )];

        save_scene(&path, &records).unwrap();
        let loaded = load_scene(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded, records);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let result = load_scene("/nonexistent/orb/scene.csv");
        assert!(matches!(result, Err(SceneError::Io(_))));
    }
}
