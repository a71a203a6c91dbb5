//! Parameter listing command.

use clap::Args;
use tandem_core::{DynamicsParams, ParamDescriptor, ParamScale, ParameterInfo};

#[derive(Args)]
pub struct ParamsArgs {
    /// Only show parameters in this group (gate or compressor)
    #[arg(long)]
    group: Option<String>,
}

pub fn run(args: ParamsArgs) -> anyhow::Result<()> {
    let params = DynamicsParams::default();
    let mut shown = 0;

    for index in 0..params.param_count() {
        let Some(desc) = params.param_info(index) else {
            continue;
        };
        if let Some(group) = &args.group
            && !desc.group.eq_ignore_ascii_case(group)
        {
            continue;
        }
        if shown == 0 {
            println!(
                "{:>3}  {:24} {:>20} {:>12}  {}",
                "#", "id", "range", "default", "name"
            );
        }
        println!("{}", format_row(index, &desc));
        shown += 1;
    }

    if shown == 0
        && let Some(group) = &args.group
    {
        anyhow::bail!("no parameters in group '{}' (expected gate or compressor)", group);
    }
    Ok(())
}

fn format_row(index: usize, desc: &ParamDescriptor) -> String {
    let unit = desc.unit.suffix();
    let range = format!("{}..{}{}", desc.min, desc.max, unit);
    let default = format!("{}{}", desc.default, unit);
    let skew = match desc.scale {
        ParamScale::Linear => String::new(),
        ParamScale::Power(exp) => format!(" (skew {})", 1.0 / exp),
    };
    format!(
        "{:>3}  {:24} {:>20} {:>12}  {}{}",
        index, desc.string_id, range, default, desc.name, skew
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tandem_core::ParamIndex;

    #[test]
    fn test_format_row() {
        let row = format_row(11, &ParamIndex::CompressorRatio.descriptor());
        assert!(row.contains("compressor_ratio"), "{row}");
        assert!(row.contains("1..20:1"), "{row}");
        assert!(row.contains("4:1"), "{row}");

        let row = format_row(7, &ParamIndex::GateRelease.descriptor());
        assert!(row.contains("(skew 0.2)"), "{row}");
    }

    #[test]
    fn test_unknown_group_errors() {
        assert!(run(ParamsArgs { group: Some("reverb".into()) }).is_err());
        assert!(run(ParamsArgs { group: Some("Gate".into()) }).is_ok());
        assert!(run(ParamsArgs { group: None }).is_ok());
    }
}
