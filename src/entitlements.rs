use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utoipa::ToSchema;

/// Licensed features the console knows by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeatureName {
    UserLimit,
    AuditLog,
    BrowserOnly,
    Scim,
    WorkspaceQuota,
}

impl FeatureName {
    pub const ALL: [FeatureName; 5] = [
        FeatureName::UserLimit,
        FeatureName::AuditLog,
        FeatureName::BrowserOnly,
        FeatureName::Scim,
        FeatureName::WorkspaceQuota,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FeatureName::UserLimit => "user_limit",
            FeatureName::AuditLog => "audit_log",
            FeatureName::BrowserOnly => "browser_only",
            FeatureName::Scim => "scim",
            FeatureName::WorkspaceQuota => "workspace_quota",
        }
    }
}

impl fmt::Display for FeatureName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Entitlement {
    Entitled,
    GracePeriod,
    NotEntitled,
}

/// Feature
///
/// One entry of the platform's entitlement report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct Feature {
    pub entitlement: Entitlement,
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual: Option<i64>,
}

/// Entitlements
///
/// The deployment's license state. Features are keyed by their wire name so
/// that features unknown to this console survive a round trip.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct Entitlements {
    #[serde(default)]
    pub features: BTreeMap<String, Feature>,
    #[serde(default)]
    pub warnings: Vec<String>,
    #[serde(default)]
    pub has_license: bool,
}

impl Entitlements {
    pub fn feature(&self, name: FeatureName) -> Option<&Feature> {
        self.features.get(name.as_str())
    }
}

/// FeatureVisibilityMap
///
/// Derived view of [`Entitlements`]: which features the console may show.
/// Features absent from the map are hidden.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FeatureVisibilityMap(BTreeMap<String, bool>);

impl FeatureVisibilityMap {
    pub fn is_visible(&self, name: FeatureName) -> bool {
        self.0.get(name.as_str()).copied().unwrap_or(false)
    }

    pub fn as_map(&self) -> &BTreeMap<String, bool> {
        &self.0
    }
}

/// feature_visibility
///
/// Without a license nothing is visible. With one, a feature is visible when
/// it is enabled and the license covers it (entitled or in its grace period).
pub fn feature_visibility(entitlements: &Entitlements) -> FeatureVisibilityMap {
    if !entitlements.has_license {
        return FeatureVisibilityMap::default();
    }
    FeatureVisibilityMap(
        entitlements
            .features
            .iter()
            .map(|(name, feature)| {
                let visible = feature.enabled && feature.entitlement != Entitlement::NotEntitled;
                (name.clone(), visible)
            })
            .collect(),
    )
}
