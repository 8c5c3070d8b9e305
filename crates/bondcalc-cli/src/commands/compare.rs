use clap::Args;
use serde_json::Value;

use bondcalc_core::comparison::{self, ComparisonInput};

use crate::input;

#[derive(Args)]
pub struct CompareArgs {
    /// Path to a JSON or YAML input file with the base loan and variants
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_compare(args: CompareArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let compare_input: ComparisonInput = if let Some(ref path) = args.input {
        input::file::read_input(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        return Err("--input <file.json|file.yaml> or stdin required for comparison".into());
    };
    let result = comparison::compare_loans(&compare_input)?;
    Ok(serde_json::to_value(result)?)
}
