//! Diagram sources: which model-json endpoint a viewer fetches from.
//!
//! The host describes its context with a [`HostContainer`] of optional ids.
//! Exactly one primary id may be set. A historic model version additionally
//! needs the model id it belongs to.

#[cfg(test)]
#[path = "source_test.rs"]
mod source_test;

use std::fmt;

use serde::Deserialize;

use crate::error::ErrorCode;

/// Modelling notation of a diagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notation {
    Bpmn,
    Cmmn,
}

/// Identifying attributes supplied by the hosting page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HostContainer {
    pub process_instance_id: Option<String>,
    pub case_instance_id: Option<String>,
    pub process_definition_id: Option<String>,
    pub case_definition_id: Option<String>,
    pub model_id: Option<String>,
    pub history_model_id: Option<String>,
    pub debugger_enabled: bool,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ContainerError {
    #[error("no diagram source attribute is set")]
    NoSource,

    #[error("conflicting diagram source attributes: {}", .0.join(", "))]
    Ambiguous(Vec<&'static str>),

    #[error("historyModelId requires modelId")]
    HistoryWithoutModel,
}

impl ErrorCode for ContainerError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::NoSource => "E_CONTAINER_NO_SOURCE",
            Self::Ambiguous(_) => "E_CONTAINER_AMBIGUOUS",
            Self::HistoryWithoutModel => "E_CONTAINER_HISTORY_WITHOUT_MODEL",
        }
    }
}

/// The one endpoint a render context fetches its snapshot from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagramSource {
    ProcessInstance(String),
    CaseInstance(String),
    ProcessDefinition(String),
    CaseDefinition(String),
    /// Design-time model.
    Model(String),
    /// One saved version of a design-time model.
    ModelHistory { model_id: String, history_id: String },
}

impl TryFrom<&HostContainer> for DiagramSource {
    type Error = ContainerError;

    fn try_from(c: &HostContainer) -> Result<Self, Self::Error> {
        let candidates = [
            ("processInstanceId", &c.process_instance_id),
            ("caseInstanceId", &c.case_instance_id),
            ("processDefinitionId", &c.process_definition_id),
            ("caseDefinitionId", &c.case_definition_id),
            ("modelId", &c.model_id),
        ];
        let present: Vec<_> = candidates.iter().filter(|(_, v)| v.is_some()).map(|(name, _)| *name).collect();
        if present.len() > 1 {
            return Err(ContainerError::Ambiguous(present));
        }

        if let Some(history_id) = &c.history_model_id {
            return match &c.model_id {
                Some(model_id) => {
                    Ok(Self::ModelHistory { model_id: model_id.clone(), history_id: history_id.clone() })
                }
                None => Err(ContainerError::HistoryWithoutModel),
            };
        }

        if let Some(id) = &c.process_instance_id {
            Ok(Self::ProcessInstance(id.clone()))
        } else if let Some(id) = &c.case_instance_id {
            Ok(Self::CaseInstance(id.clone()))
        } else if let Some(id) = &c.process_definition_id {
            Ok(Self::ProcessDefinition(id.clone()))
        } else if let Some(id) = &c.case_definition_id {
            Ok(Self::CaseDefinition(id.clone()))
        } else if let Some(id) = &c.model_id {
            Ok(Self::Model(id.clone()))
        } else {
            Err(ContainerError::NoSource)
        }
    }
}

impl DiagramSource {
    /// Notation of the fetched diagram. Design-time models report BPMN; the
    /// model-json endpoint serves both notations in the same shape.
    #[must_use]
    pub fn notation(&self) -> Notation {
        match self {
            Self::CaseInstance(_) | Self::CaseDefinition(_) => Notation::Cmmn,
            _ => Notation::Bpmn,
        }
    }

    /// Runtime instance id, when the source is a running instance.
    #[must_use]
    pub fn instance_id(&self) -> Option<&str> {
        match self {
            Self::ProcessInstance(id) | Self::CaseInstance(id) => Some(id),
            _ => None,
        }
    }

    /// Path below the application root, without a leading slash.
    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Self::ProcessInstance(id) => format!("app/rest/process-instances/{id}/model-json"),
            Self::CaseInstance(id) => format!("app/rest/case-instances/{id}/model-json"),
            Self::ProcessDefinition(id) => format!("app/rest/process-definitions/{id}/model-json"),
            Self::CaseDefinition(id) => format!("app/rest/case-definitions/{id}/model-json"),
            Self::Model(id) => format!("app/rest/models/{id}/model-json"),
            Self::ModelHistory { model_id, history_id } => {
                format!("app/rest/models/{model_id}/history/{history_id}/model-json")
            }
        }
    }

    /// Full fetch URL. `nocaching` is a timestamp that defeats intermediate
    /// caches; every fetch should pass a fresh one.
    #[must_use]
    pub fn url(&self, base_url: &str, nocaching: u128) -> String {
        format!("{}/{}?nocaching={nocaching}", base_url.trim_end_matches('/'), self.path())
    }
}

impl fmt::Display for DiagramSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ProcessInstance(id) => write!(f, "process instance {id}"),
            Self::CaseInstance(id) => write!(f, "case instance {id}"),
            Self::ProcessDefinition(id) => write!(f, "process definition {id}"),
            Self::CaseDefinition(id) => write!(f, "case definition {id}"),
            Self::Model(id) => write!(f, "model {id}"),
            Self::ModelHistory { model_id, history_id } => write!(f, "model {model_id} version {history_id}"),
        }
    }
}
