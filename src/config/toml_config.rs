use crate::core::encoding::Encoding;
use crate::core::parser::{FixedLengthFieldParser, Layout, OffsetRecordType, ParserOptions};
use crate::domain::model::{FieldSpec, OutputFormat};
use crate::utils::error::{FwfError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;

pub const DEFAULT_OUTPUT_PATH: &str = "./output";
pub const DEFAULT_BASENAME: &str = "records";

/// Layout file: the record layout plus parser and output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub layout: LayoutSection,
    #[serde(default)]
    pub parser: ParserSection,
    #[serde(default)]
    pub output: OutputSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutSection {
    pub name: String,
    pub description: Option<String>,
    pub fields: Option<Vec<FieldSpec>>,
    pub record_type: Option<RecordTypeSection>,
    pub types: Option<BTreeMap<String, Vec<FieldSpec>>>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RecordTypeSection {
    pub position: usize,
    pub length: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParserSection {
    pub field_separator: Option<String>,
    #[serde(default)]
    pub right_justified: Vec<String>,
    #[serde(default)]
    pub skip_justified: Vec<String>,
    pub skip_unknown_types: Option<bool>,
    pub strip: Option<bool>,
    pub skip_blank_lines: Option<bool>,
    pub encoding: Option<Encoding>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputSection {
    pub path: Option<String>,
    pub formats: Option<Vec<OutputFormat>>,
    pub basename: Option<String>,
    pub compress: Option<bool>,
}

impl LayoutConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(FwfError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| FwfError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${DATA_DIR})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}")
            .map_err(|e| FwfError::config(format!("invalid substitution pattern: {}", e)))?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validation::validate_non_empty_string("layout.name", &self.layout.name)?;

        match (&self.layout.fields, &self.layout.types) {
            (Some(fields), None) => Self::validate_fields("layout.fields", fields)?,
            (None, Some(types)) => {
                let record_type =
                    validation::validate_required_field("layout.record_type", &self.layout.record_type)?;
                validation::validate_positive_number("layout.record_type.length", record_type.length, 1)?;

                if types.is_empty() {
                    return Err(FwfError::ConfigValidationError {
                        field: "layout.types".to_string(),
                        message: "At least one record type must be defined".to_string(),
                    });
                }
                for (key, fields) in types {
                    if key.chars().count() != record_type.length {
                        return Err(FwfError::InvalidConfigValueError {
                            field: "layout.types".to_string(),
                            value: key.clone(),
                            reason: format!(
                                "Record type keys must be {} characters long",
                                record_type.length
                            ),
                        });
                    }
                    Self::validate_fields(&format!("layout.types.{}", key), fields)?;
                }
            }
            (Some(_), Some(_)) => {
                return Err(FwfError::ConfigValidationError {
                    field: "layout".to_string(),
                    message: "Define either fields or types, not both".to_string(),
                })
            }
            (None, None) => {
                return Err(FwfError::MissingConfigError {
                    field: "layout.fields".to_string(),
                })
            }
        }

        if let Some(separator) = &self.parser.field_separator {
            if separator.is_empty() {
                return Err(FwfError::InvalidConfigValueError {
                    field: "parser.field_separator".to_string(),
                    value: separator.clone(),
                    reason: "Separator cannot be empty; omit it instead".to_string(),
                });
            }
        }

        let known = self.field_names();
        validation::validate_known_names("parser.right_justified", &self.parser.right_justified, &known)?;
        validation::validate_known_names("parser.skip_justified", &self.parser.skip_justified, &known)?;

        validation::validate_path("output.path", self.output_path())?;
        validation::validate_non_empty_string("output.basename", self.basename())?;

        Ok(())
    }

    fn validate_fields(section: &str, fields: &[FieldSpec]) -> Result<()> {
        if fields.is_empty() {
            return Err(FwfError::ConfigValidationError {
                field: section.to_string(),
                message: "At least one field must be defined".to_string(),
            });
        }
        for (i, field) in fields.iter().enumerate() {
            validation::validate_non_empty_string(&format!("{}[{}].name", section, i), &field.name)?;
            validation::validate_positive_number(&format!("{}[{}].length", section, i), field.length, 1)?;
        }
        Ok(())
    }

    fn field_names(&self) -> HashSet<&str> {
        let uniform = self.layout.fields.iter().flatten();
        let typed = self.layout.types.iter().flat_map(|types| types.values().flatten());
        uniform.chain(typed).map(|f| f.name.as_str()).collect()
    }

    /// 建立解析器（會先驗證配置）
    pub fn build_parser(&self) -> Result<FixedLengthFieldParser> {
        self.validate_config()?;

        let layout = match (&self.layout.fields, &self.layout.types, self.layout.record_type) {
            (Some(fields), _, _) => Layout::Uniform(fields.clone()),
            (None, Some(types), Some(rt)) => Layout::typed(
                OffsetRecordType::new(rt.position, rt.length),
                types.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
            ),
            _ => return Err(FwfError::config("layout has neither fields nor typed records")),
        };

        let defaults = ParserOptions::default();
        let options = ParserOptions {
            field_separator: self.parser.field_separator.clone(),
            right_justified: self.parser.right_justified.iter().cloned().collect(),
            skip_justified: self.parser.skip_justified.iter().cloned().collect(),
            skip_unknown_types: self.parser.skip_unknown_types.unwrap_or(defaults.skip_unknown_types),
            strip: self.parser.strip.unwrap_or(defaults.strip),
            encoding: self.parser.encoding.unwrap_or(defaults.encoding),
            skip_blank_lines: self.parser.skip_blank_lines.unwrap_or(defaults.skip_blank_lines),
        };

        Ok(FixedLengthFieldParser::new(layout, options))
    }

    /// 取得輸出路徑
    pub fn output_path(&self) -> &str {
        self.output.path.as_deref().unwrap_or(DEFAULT_OUTPUT_PATH)
    }

    /// 取得輸出格式
    pub fn output_formats(&self) -> Vec<OutputFormat> {
        match &self.output.formats {
            Some(formats) => OutputFormat::dedup(formats.iter().copied()),
            None => vec![OutputFormat::Csv],
        }
    }

    pub fn basename(&self) -> &str {
        self.output.basename.as_deref().unwrap_or(DEFAULT_BASENAME)
    }

    pub fn compress(&self) -> bool {
        self.output.compress.unwrap_or(false)
    }

    /// Total record length of each layout, including separators.
    pub fn record_lengths(&self) -> BTreeMap<String, usize> {
        let separator_len = self
            .parser
            .field_separator
            .as_deref()
            .map_or(0, |s| s.chars().count());
        let total = |fields: &[FieldSpec]| {
            fields.iter().map(|f| f.length).sum::<usize>()
                + separator_len * fields.len().saturating_sub(1)
        };

        let mut lengths = BTreeMap::new();
        if let Some(fields) = &self.layout.fields {
            lengths.insert(String::new(), total(fields));
        }
        if let Some(types) = &self.layout.types {
            for (key, fields) in types {
                lengths.insert(key.clone(), total(fields));
            }
        }
        lengths
    }
}

impl Validate for LayoutConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
