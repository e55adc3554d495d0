use std::collections::HashMap;

use crate::{
    model::{FieldMask, Parameter, ParameterFormat},
    resource::ParameterName,
};

/// A single field change applied by an `UpdateParameter` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParameterUpdate {
    /// Associate a Cloud KMS key, or remove the association with `None`.
    KmsKey(Option<String>),
    /// Replace the labels.
    Labels(HashMap<String, String>),
    Format(ParameterFormat),
}

impl ParameterUpdate {
    /// Field mask path of the field this update writes.
    #[must_use]
    pub const fn path(&self) -> &'static str {
        match self {
            Self::KmsKey(_) => "kms_key",
            Self::Labels(_) => "labels",
            Self::Format(_) => "format",
        }
    }

    fn apply(self, parameter: &mut Parameter) {
        match self {
            Self::KmsKey(kms_key) => parameter.kms_key = kms_key,
            Self::Labels(labels) => parameter.labels = Some(labels),
            Self::Format(format) => parameter.format = Some(format),
        }
    }
}

/// Partial update of a parameter.
///
/// The payload and the field mask are built from the same list of
/// [`ParameterUpdate`]s: the mask names exactly the fields the payload
/// sets, so the service leaves every other attribute untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateParameterRequest {
    name: ParameterName,
    parameter: Parameter,
    update_mask: FieldMask,
}

impl UpdateParameterRequest {
    pub fn new(name: ParameterName, updates: impl IntoIterator<Item = ParameterUpdate>) -> Self {
        let mut parameter = Parameter {
            name: name.to_string(),
            ..Default::default()
        };
        let mut update_mask = FieldMask::default();
        for update in updates {
            let path = update.path();
            if !update_mask.contains(path) {
                update_mask.paths.push(path.to_owned());
            }
            update.apply(&mut parameter);
        }
        Self {
            name,
            parameter,
            update_mask,
        }
    }

    pub fn set_kms_key(name: ParameterName, kms_key: impl Into<String>) -> Self {
        Self::new(name, [ParameterUpdate::KmsKey(Some(kms_key.into()))])
    }

    pub fn clear_kms_key(name: ParameterName) -> Self {
        Self::new(name, [ParameterUpdate::KmsKey(None)])
    }

    #[must_use]
    pub const fn name(&self) -> &ParameterName {
        &self.name
    }

    /// The delta sent as request body.
    #[must_use]
    pub const fn parameter(&self) -> &Parameter {
        &self.parameter
    }

    #[must_use]
    pub const fn update_mask(&self) -> &FieldMask {
        &self.update_mask
    }
}
