//! Dispatcher handlers for `toolbox cloud profile ...` (spec.md §6), wiring
//! CLI tokens onto [`crate::profiles::ProfileService`].
use crate::cli::CloudProfileCommand;
use crate::error::{Result, ToolboxError};
use crate::profiles::model::{AwsCredentials, AzureCredentials, GcpCredentials, Profile};
use crate::profiles::{Credentials, ProfileService, Provider};
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

pub fn run(command: CloudProfileCommand, base_dir: &Path) -> Result<String> {
    let mut service = ProfileService::new_with_dir(base_dir)?;

    match command {
        CloudProfileCommand::Add {
            provider,
            name,
            default,
            region,
            account_id,
            role_id,
        } => {
            let provider = Provider::from_str(&provider)?;
            let credentials = read_credentials_from_stdin(provider)?;

            let mut profile = Profile::draft(name, provider);
            profile.default = default;
            profile.region = region;
            profile.account_id = account_id;
            profile.role_id = role_id;

            service.add_profile(profile, credentials)?;
            Ok("profile added".to_string())
        }
        CloudProfileCommand::List { provider, json } => {
            let provider = Provider::from_str(&provider)?;
            let profiles = service.list_profiles(provider)?;
            if json {
                Ok(serde_json::to_string_pretty(&profiles)?)
            } else {
                Ok(render_profile_list(&profiles))
            }
        }
        CloudProfileCommand::Use { provider, name } => {
            let provider = Provider::from_str(&provider)?;
            service.set_default(provider, &name)?;
            Ok(format!("{name} is now the default {provider} profile"))
        }
        CloudProfileCommand::Rm { provider, name } => {
            let provider = Provider::from_str(&provider)?;
            service.delete_profile(provider, &name)?;
            Ok(format!("removed {provider}/{name}"))
        }
    }
}

/// Reads a JSON credential document from stdin and tags it with `provider`.
/// Field names mirror the provider's native credential shape (spec.md §3).
fn read_credentials_from_stdin(provider: Provider) -> Result<Credentials> {
    let mut input = String::new();
    std::io::stdin()
        .read_to_string(&mut input)
        .map_err(ToolboxError::Io)?;
    if input.trim().is_empty() {
        return Err(ToolboxError::Usage(
            "expected a JSON credentials document on stdin".to_string(),
        ));
    }

    let value: serde_json::Value = serde_json::from_str(&input)?;
    Ok(match provider {
        Provider::Aws => Credentials::Aws(serde_json::from_value::<AwsCredentials>(value)?),
        Provider::Azure => Credentials::Azure(serde_json::from_value::<AzureCredentials>(value)?),
        Provider::Gcp => Credentials::Gcp(serde_json::from_value::<GcpCredentials>(value)?),
    })
}

fn render_profile_list(profiles: &[Profile]) -> String {
    if profiles.is_empty() {
        return "(no profiles)".to_string();
    }
    let mut out = String::new();
    for profile in profiles {
        let marker = if profile.default { " *" } else { "" };
        out.push_str(&format!("{}{marker}\n", profile.name));
    }
    out
}
