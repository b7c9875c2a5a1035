//! Prompt rendering via `minijinja`.
//!
//! The template sees the whole [`CandidateSet`] as `set`, plus flat lists
//! that line up with `set.candidates`:
//!
//! | Variable               | Type              |
//! |------------------------|-------------------|
//! | `routes`               | list of lists of segment ids |
//! | `traffic_light_count`  | list of integers  |
//! | `estimated_time_list`  | list of seconds   |
//! | `vehicle_density_list` | list of floats    |
//!
//! The built-in template asks for a JSON reply, `{"chosen_path": [...]}`.

use std::path::Path;

use minijinja::{Environment, context};

use crate::{CandidateSet, OracleError, OracleResult};

const TEMPLATE_NAME: &str = "reroute";

/// Built-in prompt.
pub const DEFAULT_TEMPLATE: &str = r#"You are a driver operating a car on city roads.
Now you have reached an intersection at the end of road {{ set.current }}.
You want to reach road {{ set.target }} and can choose one of {{ routes|length }} available routes.
{% for c in set.candidates %}
Route {{ loop.index }}: {{ c.route|join(" ") }}
  traffic lights: {{ c.metrics.signal_count }}
  estimated time: {{ c.metrics.estimated_time|round(1) }} s
  vehicle density: {{ c.metrics.density|round(3) }}
{% endfor %}
Please choose the best route to minimize delay and traffic issues.

Reply with JSON only, copying the chosen route exactly:
{"chosen_path": ["<road>", "..."], "reason": "<one sentence>"}
"#;

/// A compiled prompt template.
pub struct PromptTemplate {
    env: Environment<'static>,
}

impl PromptTemplate {
    /// Compile `source`.
    ///
    /// # Errors
    ///
    /// [`OracleError::Template`] on a template syntax error.
    pub fn from_source(source: impl Into<String>) -> OracleResult<Self> {
        let mut env = Environment::new();
        env.add_template_owned(TEMPLATE_NAME, source.into())
            .map_err(|e| OracleError::Template(format!("failed to compile prompt: {e}")))?;
        Ok(Self { env })
    }

    /// Read and compile a template file.
    pub fn from_file(path: &Path) -> OracleResult<Self> {
        let source = std::fs::read_to_string(path).map_err(|e| {
            OracleError::Template(format!("failed to read {}: {e}", path.display()))
        })?;
        Self::from_source(source)
    }

    /// The built-in template.
    pub fn builtin() -> OracleResult<Self> {
        Self::from_source(DEFAULT_TEMPLATE)
    }

    /// Render the prompt for one decision.
    pub fn render(&self, set: &CandidateSet) -> OracleResult<String> {
        let candidates = &set.candidates;
        let ctx = context! {
            set,
            routes               => candidates.iter().map(|c| &c.route).collect::<Vec<_>>(),
            traffic_light_count  => candidates.iter().map(|c| c.metrics.signal_count).collect::<Vec<_>>(),
            estimated_time_list  => candidates.iter().map(|c| c.metrics.estimated_time).collect::<Vec<_>>(),
            vehicle_density_list => candidates.iter().map(|c| c.metrics.density).collect::<Vec<_>>(),
        };
        self.env
            .get_template(TEMPLATE_NAME)
            .map_err(|e| OracleError::Template(format!("missing prompt template: {e}")))?
            .render(ctx)
            .map_err(|e| OracleError::Template(format!("prompt render failed: {e}")))
    }
}
