use crate::error::ActionError;
use crate::github::Workflow;

/// First workflow whose display name matches exactly (case-sensitive).
pub fn resolve_workflow<'a>(
    name: &str,
    workflows: &'a [Workflow],
) -> Result<&'a Workflow, ActionError> {
    workflows
        .iter()
        .find(|workflow| workflow.name == name)
        .ok_or_else(|| ActionError::WorkflowNotFound {
            name: name.to_string(),
        })
}
