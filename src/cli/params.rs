use crate::error::Result;
use crate::header::KeySchedule;
use crate::pipeline::{generate_params, Seed};

/// Options for the params command
#[derive(Debug, Clone, Default)]
pub struct ParamsOptions {
    pub seed: Seed,
    pub schedule: KeySchedule,
    pub blocks: usize,
}

/// Render the parameter set for a seed as pretty JSON
pub fn dump_params(options: &ParamsOptions) -> Result<String> {
    let params = generate_params(&options.seed, options.blocks, options.schedule);
    Ok(serde_json::to_string_pretty(&params)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dump_params() {
        let options = ParamsOptions {
            seed: Seed::int(114_514),
            blocks: 4,
            ..Default::default()
        };
        let json = dump_params(&options).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let blocks = value.as_array().unwrap();
        assert_eq!(blocks.len(), 4);
        assert_eq!(blocks[0]["perm_target"], 3);
        assert_eq!(blocks[0]["rotation"], 1);
        assert_eq!(blocks[0]["flip"], "both");
        assert_eq!(blocks[2]["invert"], true);
        assert_eq!(blocks[3]["color_perm"], serde_json::json!([0, 2, 1]));
    }

    #[test]
    fn test_dump_no_blocks() {
        let json = dump_params(&ParamsOptions::default()).unwrap();
        assert_eq!(json, "[]");
    }
}
