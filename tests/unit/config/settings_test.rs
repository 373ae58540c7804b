// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use bbs_poller::config::settings::{validate, RawSettings, Settings};
use std::path::PathBuf;

fn sample_config() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("config")
        .join("example.yaml")
}

#[test]
fn test_sample_config_is_valid() {
    let path = sample_config();
    let path = path.to_str().unwrap();

    let raw = RawSettings::load(path).unwrap();
    assert!(validate(&raw));

    let settings = Settings::load(path).unwrap();
    assert!(settings.sites.contains_key("clien"));
    let site = &settings.sites["clien"];
    assert!(!site.blocked_authors.is_empty());
    assert!(site.polling.lower_limit <= site.polling.upper_limit);
}
