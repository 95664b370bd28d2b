//! Version command implementation

use crate::error::Result;
use crate::validate::Rule;

/// Run version command
pub fn run() -> Result<()> {
    println!("charmbundle {}", env!("CARGO_PKG_VERSION"));
    println!();
    print!("{}", rule_table());

    Ok(())
}

/// Rule codes with their default severity, as accepted by `--ignore`
fn rule_table() -> String {
    let width = Rule::ALL.iter().map(|r| r.code().len()).max().unwrap_or(0);
    let mut out = format!("Rules ({}):\n", Rule::ALL.len());
    for rule in Rule::ALL {
        out.push_str(&format!(
            "  {:width$}  {}\n",
            rule.code(),
            rule.default_severity()
        ));
    }
    out
}
