use serde::{Deserialize, Serialize};

pub trait ConfigSerializer<TConfig> {
    fn serialize(&self, config: &TConfig) -> Result<String, String>;
    fn deserialize(&self, content: &str) -> Result<TConfig, String>;
}

/// YAML text, optionally preceded by `#` comment lines so a hand-edited
/// file explains itself.
#[derive(Default)]
pub struct YamlConfigSerializer {
    header: Vec<String>,
}

impl YamlConfigSerializer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_header(header: &str) -> Self {
        Self {
            header: header.lines().map(|line| line.trim_end().to_string()).collect(),
        }
    }
}

impl<TConfig> ConfigSerializer<TConfig> for YamlConfigSerializer
where
    TConfig: for<'de> Deserialize<'de> + Serialize,
{
    fn serialize(&self, config: &TConfig) -> Result<String, String> {
        let body = serde_yaml_ng::to_string(config)
            .map_err(|e| format!("Failed to write config as YAML: {}", e))?;

        let mut content = String::new();
        for line in &self.header {
            if line.is_empty() {
                content.push_str("#\n");
            } else {
                content.push_str("# ");
                content.push_str(line);
                content.push('\n');
            }
        }
        content.push_str(&body);
        Ok(content)
    }

    fn deserialize(&self, content: &str) -> Result<TConfig, String> {
        serde_yaml_ng::from_str(content).map_err(|e| format!("Failed to parse YAML config: {}", e))
    }
}
