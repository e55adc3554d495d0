//! JSON representation of the Parameter Manager v1 resources.
//!
//! Every optional field is skipped when unset: a [`Parameter`] used as an
//! update payload only carries the fields the update sets.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Format of the payload stored in the versions of a parameter.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ParameterFormat {
    #[default]
    ParameterFormatUnspecified,
    Unformatted,
    Yaml,
    Json,
}

/// Output only identities the service grants access to the parameter.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ResourcePolicyMember {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iam_policy_uid_principal: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iam_policy_name_principal: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Parameter {
    /// `projects/*/locations/*/parameters/*`
    #[serde(default)]
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub create_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub update_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<HashMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<ParameterFormat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub policy_member: Option<ResourcePolicyMember>,
    /// Cloud KMS key protecting the parameter versions, e.g.
    /// `projects/p/locations/global/keyRings/r/cryptoKeys/k`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kms_key: Option<String>,
}

/// Set of fields an update is allowed to touch, in proto (`snake_case`) notation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FieldMask {
    pub paths: Vec<String>,
}

impl FieldMask {
    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        self.paths.iter().any(|p| p == path)
    }

    /// JSON mapping of a `google.protobuf.FieldMask`: the paths converted
    /// to lowerCamelCase and joined with commas.
    #[must_use]
    pub fn to_query_value(&self) -> String {
        self.paths
            .iter()
            .map(|path| {
                path.split('.')
                    .map(snake_to_lower_camel)
                    .collect::<Vec<_>>()
                    .join(".")
            })
            .collect::<Vec<_>>()
            .join(",")
    }
}

fn snake_to_lower_camel(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    let mut upper_next = false;
    for c in segment.chars() {
        if c == '_' {
            upper_next = true;
        } else if upper_next {
            out.extend(c.to_uppercase());
            upper_next = false;
        } else {
            out.push(c);
        }
    }
    out
}

/// Error body returned by Google APIs.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct GoogleApiErrorBody {
    pub error: GoogleApiErrorContent,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct GoogleApiErrorContent {
    #[serde(default)]
    pub code: u16,
    pub message: String,
    #[serde(default)]
    pub status: String,
}
