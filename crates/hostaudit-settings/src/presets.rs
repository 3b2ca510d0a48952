use hostaudit_domain::policy::{CredentialInjection, EffectiveConfig, HostKeyPolicy};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_KNOWN_HOSTS: &str = "~/.ssh/known_hosts";

/// Preset profiles are opinionated defaults.
pub fn preset(profile: &str) -> Option<EffectiveConfig> {
    match profile {
        "strict" => Some(strict_profile()),
        "lab" => Some(lab_profile()),
        _ => None,
    }
}

fn strict_profile() -> EffectiveConfig {
    EffectiveConfig {
        profile: "strict".to_string(),
        port: 22,
        concurrency: 1,
        connect_timeout: Duration::from_secs(10),
        host_timeout: Some(Duration::from_secs(300)),
        host_keys: HostKeyPolicy::Strict {
            known_hosts: PathBuf::from(DEFAULT_KNOWN_HOSTS),
        },
        credential_injection: CredentialInjection::Stdin,
    }
}

/// Throwaway lab machines whose host keys change on every rebuild.
fn lab_profile() -> EffectiveConfig {
    EffectiveConfig {
        profile: "lab".to_string(),
        concurrency: 4,
        host_keys: HostKeyPolicy::AcceptAny,
        ..strict_profile()
    }
}
