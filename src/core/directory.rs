use crate::domain::model::TheatreRecord;
use crate::utils::error::{FinderError, Result};
use serde_json::Value;

pub const NEARBY_GROUP: &str = "nearbyTheatres";
pub const OTHER_GROUP: &str = "otherTheatres";

const UNKNOWN_THEATRE: &str = "Unknown Theatre";

/// 啟動時載入一次的影院清單，之後唯讀
#[derive(Debug, Clone, Default)]
pub struct TheatreDirectory {
    theatres: Vec<TheatreRecord>,
}

impl TheatreDirectory {
    pub fn new(theatres: Vec<TheatreRecord>) -> Self {
        Self { theatres }
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let value: Value = serde_json::from_slice(bytes)?;
        Self::from_value(value)
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(content)?;
        Self::from_value(value)
    }

    /// 接受單一清單，或含 nearbyTheatres / otherTheatres 分組的物件
    pub fn from_value(value: Value) -> Result<Self> {
        let entries = match value {
            Value::Array(items) => {
                tracing::info!("Loaded {} theatre entries from list data", items.len());
                items
            }
            Value::Object(mut groups) => {
                let mut entries = Vec::new();
                let mut groups_found = 0;

                for group in [NEARBY_GROUP, OTHER_GROUP] {
                    match groups.remove(group) {
                        Some(Value::Array(items)) => {
                            tracing::info!("Loaded {} theatre entries from '{}'", items.len(), group);
                            groups_found += 1;
                            entries.extend(items);
                        }
                        Some(other) => {
                            return Err(FinderError::DirectoryFormatError {
                                message: format!(
                                    "'{}' must be a list, found {}",
                                    group,
                                    json_kind(&other)
                                ),
                            });
                        }
                        None => tracing::warn!("⚠️ No '{}' group found in theatre data", group),
                    }
                }

                if groups_found == 0 {
                    return Err(FinderError::DirectoryFormatError {
                        message: format!(
                            "object contains neither '{}' nor '{}'",
                            NEARBY_GROUP, OTHER_GROUP
                        ),
                    });
                }

                entries
            }
            other => {
                return Err(FinderError::DirectoryFormatError {
                    message: format!("expected a list or an object, found {}", json_kind(&other)),
                });
            }
        };

        let theatres: Vec<TheatreRecord> = entries
            .iter()
            .enumerate()
            .filter_map(|(index, entry)| match parse_record(entry) {
                Ok(record) => Some(record),
                Err(field) => {
                    tracing::warn!(
                        "Skipping theatre entry #{}: missing or invalid field '{}'",
                        index,
                        field
                    );
                    None
                }
            })
            .collect();

        tracing::info!("📂 Total theatres loaded: {}", theatres.len());
        Ok(Self { theatres })
    }

    /// 城市與省份代碼皆須完全相符（不分大小寫）
    pub fn find_theatres(&self, city: &str, province: &str) -> Vec<TheatreRecord> {
        let city_key = city.trim().to_lowercase();
        let province_key = province.trim().to_lowercase();

        let matches: Vec<TheatreRecord> = self
            .theatres
            .iter()
            .filter(|t| {
                t.city.to_lowercase() == city_key && t.province_code.to_lowercase() == province_key
            })
            .cloned()
            .collect();

        tracing::info!(
            "Found {} theatres matching city '{}' and province '{}'",
            matches.len(),
            city,
            province
        );
        matches
    }

    pub fn theatres(&self) -> &[TheatreRecord] {
        &self.theatres
    }

    pub fn len(&self) -> usize {
        self.theatres.len()
    }

    pub fn is_empty(&self) -> bool {
        self.theatres.is_empty()
    }
}

fn parse_record(entry: &Value) -> std::result::Result<TheatreRecord, &'static str> {
    let id = match entry.get("theatreId") {
        Some(Value::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        _ => return Err("theatreId"),
    };

    let city = non_empty_str(entry.pointer("/location/city")).ok_or("location.city")?;
    let province_code =
        non_empty_str(entry.pointer("/location/provinceCode")).ok_or("location.provinceCode")?;

    let name = non_empty_str(entry.get("theatreName")).unwrap_or(UNKNOWN_THEATRE);

    Ok(TheatreRecord {
        id,
        name: name.to_string(),
        city: city.to_string(),
        province_code: province_code.to_string(),
    })
}

fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
