use std::fmt::{self, Display};

/// Location used by the global (non regional) Parameter Manager endpoint.
pub const GLOBAL_LOCATION: &str = "global";

/// Resource name of a parameter:
/// `projects/{project_id}/locations/{location}/parameters/{parameter_id}`.
///
/// Nothing is validated locally: an unknown project or an invalid
/// identifier is rejected by the service.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ParameterName {
    project_id: String,
    location: String,
    parameter_id: String,
}

impl ParameterName {
    pub fn new(
        project_id: impl Into<String>,
        location: impl Into<String>,
        parameter_id: impl Into<String>,
    ) -> Self {
        Self {
            project_id: project_id.into(),
            location: location.into(),
            parameter_id: parameter_id.into(),
        }
    }

    /// A parameter of the `global` location.
    pub fn global(project_id: impl Into<String>, parameter_id: impl Into<String>) -> Self {
        Self::new(project_id, GLOBAL_LOCATION, parameter_id)
    }

    /// The path segments of the resource name, each one kept whole so
    /// that it can be percent-encoded on its own.
    #[must_use]
    pub fn segments(&self) -> [&str; 6] {
        [
            "projects",
            &self.project_id,
            "locations",
            &self.location,
            "parameters",
            &self.parameter_id,
        ]
    }

    /// `projects/{project_id}/locations/{location}`
    #[must_use]
    pub fn parent(&self) -> String {
        format!("projects/{}/locations/{}", self.project_id, self.location)
    }
}

impl Display for ParameterName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/parameters/{}", self.parent(), self.parameter_id)
    }
}

#[cfg(test)]
mod tests {
    use super::ParameterName;

    #[test]
    fn test_global_parameter_name() {
        let name = ParameterName::global("p1", "param1");
        assert_eq!(
            name.to_string(),
            "projects/p1/locations/global/parameters/param1"
        );
        assert_eq!(name.parent(), "projects/p1/locations/global");
        assert_eq!(
            name.segments(),
            ["projects", "p1", "locations", "global", "parameters", "param1"]
        );
    }

    #[test]
    fn test_no_local_validation() {
        let name = ParameterName::new("my project", "us-east1", "a/b");
        assert_eq!(
            name.to_string(),
            "projects/my project/locations/us-east1/parameters/a/b"
        );
        assert_eq!(name.segments()[5], "a/b");
    }
}
