use std::process::Command;

use anyhow::{Context, Result};

/// `None` means the crate's default features.
const FEATURE_COMBINATIONS: &[Option<&[&str]>] = &[
    None,          // default (redis)
    Some(&[]),     // in-memory store only
    Some(&["redis"]),
];

/// Check that all required feature combinations compile successfully.
pub fn test_feature_matrix() -> Result<()> {
    println!("Testing {} proxyq-infra feature combinations...", FEATURE_COMBINATIONS.len());

    for (index, features) in FEATURE_COMBINATIONS.iter().enumerate() {
        let display_label = match features {
            None => "default".to_string(),
            Some([]) => "no-default-features".to_string(),
            Some(list) => list.join(","),
        };

        let mut command = Command::new("cargo");
        command.arg("check").arg("-p").arg("proxyq-infra").arg("--all-targets");
        if let Some(list) = features {
            command.arg("--no-default-features");
            if !list.is_empty() {
                command.arg("--features").arg(list.join(","));
            }
        }

        println!("\n[{}/{}] cargo check -p proxyq-infra ({display_label})", index + 1, FEATURE_COMBINATIONS.len());

        let status = command
            .status()
            .with_context(|| format!("Failed to run cargo check for '{display_label}'"))?;

        if !status.success() {
            anyhow::bail!("Feature combination '{display_label}' failed to compile");
        }

        println!("✅ Features '{display_label}' compiled successfully");
    }

    println!("\n✅ All {} feature combinations compile successfully!", FEATURE_COMBINATIONS.len());

    Ok(())
}
