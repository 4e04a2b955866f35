//! Populates filter menus from backend lookups.
//!
//! Loading runs as an ordered list of steps. Each step is awaited before the
//! next starts; steps whose capability the user lacks are skipped without a
//! backend call. The first failing step ends the run with an error.

use std::sync::Arc;

use async_trait::async_trait;

use super::menu::{MenuOption, MenuOptions, OnClick, DECLARED, UNDECLARED};
use super::{ranges, FilterDefinition};
use crate::auth::{Capability, CapabilityPolicy};
use crate::errors::{ClientError, Result};
use crate::models::{TeamGroup, UserProfile};

/// Menu keys populated by the loader.
pub mod keys {
    pub const MAJORS: &str = "majors";
    pub const GPA_RANGES: &str = "gpaRanges";
    pub const LEVELS: &str = "levels";
    pub const UNIT_RANGES: &str = "unitRanges";
    pub const GROUP_CODES: &str = "groupCodes";
    pub const ADVISORS: &str = "advisorLdapUid";
}

/// Backend lookups behind the filter menus.
#[async_trait]
pub trait OptionSource: Send + Sync {
    /// Majors held by students the user can see.
    async fn relevant_majors(&self) -> Result<Vec<String>>;

    async fn all_team_groups(&self) -> Result<Vec<TeamGroup>>;

    async fn profiles_per_dept_code(&self, dept_code: &str) -> Result<Vec<UserProfile>>;

    fn gpa_ranges(&self) -> Vec<MenuOption> {
        ranges::gpa_ranges()
    }

    fn student_levels(&self) -> Vec<MenuOption> {
        ranges::student_levels()
    }

    fn unit_ranges(&self) -> Vec<MenuOption> {
        ranges::unit_ranges()
    }
}

/// Build the majors menu.
///
/// Department-specific "undeclared" entries are dropped in favour of the
/// generic "Undeclared" header. The two headers come first, then a separator.
pub fn major_options(majors: Vec<String>) -> MenuOptions {
    let mut options: MenuOptions = vec![
        Some(MenuOption::named(DECLARED).with_on_click(OnClick::MajorOptionGroup)),
        Some(MenuOption::named(UNDECLARED).with_on_click(OnClick::MajorOptionGroup)),
        None,
    ];
    options.extend(
        majors
            .into_iter()
            .filter(|major| !major.to_lowercase().contains("undeclared"))
            .map(|major| Some(MenuOption::named(major))),
    );
    options
}

/// Replace the options of the definition with `key`.
///
/// Returns false, leaving `definitions` untouched, when no definition has the key.
pub fn set_menu_options(
    definitions: &mut [FilterDefinition],
    key: &str,
    options: impl IntoIterator<Item = MenuOption>,
) -> bool {
    set_menu_entries(definitions, key, options.into_iter().map(Some).collect())
}

fn set_menu_entries(definitions: &mut [FilterDefinition], key: &str, options: MenuOptions) -> bool {
    match definitions.iter_mut().find(|d| d.key == key) {
        Some(definition) => {
            definition.options = options;
            true
        }
        None => {
            tracing::warn!("No filter definition with menu key '{}'", key);
            false
        }
    }
}

/// One unit of work in a load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStep {
    /// Majors plus the static range lists; always runs
    Majors,
    /// Athletic team groups; needs [`Capability::Asc`]
    TeamGroups,
    /// Advisors of the configured department; needs [`Capability::Coe`]
    Advisors,
}

impl LoadStep {
    /// Steps in the order they run.
    pub const ALL: [LoadStep; 3] = [LoadStep::Majors, LoadStep::TeamGroups, LoadStep::Advisors];

    pub fn as_str(&self) -> &'static str {
        match self {
            LoadStep::Majors => "majors",
            LoadStep::TeamGroups => "teamGroups",
            LoadStep::Advisors => "advisors",
        }
    }

    pub fn required_capability(&self) -> Option<Capability> {
        match self {
            LoadStep::Majors => None,
            LoadStep::TeamGroups => Some(Capability::Asc),
            LoadStep::Advisors => Some(Capability::Coe),
        }
    }
}

/// What happened to a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Ran,
    Skipped,
}

/// Runs the load steps in order against an [`OptionSource`].
pub struct OptionLoader {
    source: Arc<dyn OptionSource>,
    policy: Arc<dyn CapabilityPolicy>,
    advisor_dept_code: String,
}

impl OptionLoader {
    pub fn new(
        source: Arc<dyn OptionSource>,
        policy: Arc<dyn CapabilityPolicy>,
        advisor_dept_code: impl Into<String>,
    ) -> Self {
        Self {
            source,
            policy,
            advisor_dept_code: advisor_dept_code.into(),
        }
    }

    /// Populate `definitions`, then hand them to `on_complete`.
    ///
    /// `on_complete` runs only when every step succeeded or was skipped. A
    /// failure is returned as [`ClientError::StepFailed`] naming the step.
    pub async fn load_filter_options<F>(
        &self,
        definitions: &mut [FilterDefinition],
        on_complete: F,
    ) -> Result<()>
    where
        F: FnOnce(&[FilterDefinition]),
    {
        self.run(definitions).await?;
        on_complete(definitions);
        Ok(())
    }

    /// Run every step in order, reporting what each did.
    pub async fn run(&self, definitions: &mut [FilterDefinition]) -> Result<Vec<StepOutcome>> {
        let mut outcomes = Vec::with_capacity(LoadStep::ALL.len());
        for step in LoadStep::ALL {
            let outcome = self.run_step(step, definitions).await.map_err(|e| {
                tracing::warn!("Filter option step '{}' failed: {}", step.as_str(), e);
                ClientError::StepFailed {
                    step: step.as_str(),
                    source: Box::new(e),
                }
            })?;
            tracing::debug!("Filter option step '{}': {:?}", step.as_str(), outcome);
            outcomes.push(outcome);
        }
        Ok(outcomes)
    }

    async fn run_step(
        &self,
        step: LoadStep,
        definitions: &mut [FilterDefinition],
    ) -> Result<StepOutcome> {
        if let Some(capability) = step.required_capability() {
            if !self.policy.can_view(capability) {
                tracing::debug!(
                    "Skipping '{}': user cannot view {}",
                    step.as_str(),
                    capability.as_str()
                );
                return Ok(StepOutcome::Skipped);
            }
        }

        match step {
            LoadStep::Majors => {
                let majors = self.source.relevant_majors().await?;
                set_menu_entries(definitions, keys::MAJORS, major_options(majors));
                set_menu_options(definitions, keys::GPA_RANGES, self.source.gpa_ranges());
                set_menu_options(definitions, keys::LEVELS, self.source.student_levels());
                set_menu_options(definitions, keys::UNIT_RANGES, self.source.unit_ranges());
            }
            LoadStep::TeamGroups => {
                let groups = self.source.all_team_groups().await?;
                set_menu_options(
                    definitions,
                    keys::GROUP_CODES,
                    groups
                        .into_iter()
                        .map(|group| MenuOption::new(group.name, group.group_code)),
                );
            }
            LoadStep::Advisors => {
                let profiles = self
                    .source
                    .profiles_per_dept_code(&self.advisor_dept_code)
                    .await?;
                set_menu_options(
                    definitions,
                    keys::ADVISORS,
                    profiles
                        .into_iter()
                        .map(|user| MenuOption::new(user.full_name(), user.uid)),
                );
            }
        }
        Ok(StepOutcome::Ran)
    }
}
