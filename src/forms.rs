//! Operation inputs as submitted by the page, and the presence/format checks
//! that must pass before any request is issued.

use crate::errors::OperationError;
use crate::models::{CampaignStatus, NewCampaign, NewSegment, NewTemplate};
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TemplateForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub content: String,
}

impl TemplateForm {
    pub fn validate(&self) -> Result<NewTemplate, OperationError> {
        let name = required(&self.name, "Template name is required.")?;
        required(&self.content, "Template content is required.")?;
        Ok(NewTemplate {
            id: name.to_string(),
            content: self.content.clone(),
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SegmentForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub topic: String,
    #[serde(default)]
    pub rule: String,
}

impl SegmentForm {
    pub fn validate(&self) -> Result<NewSegment, OperationError> {
        let name = required(&self.name, "Segment name is required.")?;
        let topic = required(&self.topic, "Segment topic is required.")?;
        let rule = required(&self.rule, "Segment rule is required.")?;
        let rule = match serde_json::from_str::<Value>(rule) {
            Ok(Value::Object(rule)) => rule,
            Ok(_) => return Err(OperationError::validation("Segment rule must be a JSON object.")),
            Err(err) => {
                return Err(OperationError::validation(format!(
                    "Segment rule must be valid JSON: {err}"
                )));
            }
        };

        Ok(NewSegment {
            id: name.to_string(),
            name: name.to_string(),
            topic: topic.to_string(),
            rule,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CampaignForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub topic: String,
    #[serde(default)]
    pub template_id: String,
    #[serde(default)]
    pub segment_id: String,
}

impl CampaignForm {
    pub fn validate(&self) -> Result<NewCampaign, OperationError> {
        let name = required(&self.name, "Campaign name is required.")?;
        let topic = required(&self.topic, "Campaign topic is required.")?;
        let template_id = required(&self.template_id, "Select a template.")?;
        let segment_id = required(&self.segment_id, "Select a segment.")?;
        Ok(NewCampaign {
            id: name.to_string(),
            name: name.to_string(),
            topic: topic.to_string(),
            template_id: template_id.to_string(),
            segment_id: segment_id.to_string(),
            status: CampaignStatus::Scheduled,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RunForm {
    #[serde(default)]
    pub campaign_id: String,
}

impl RunForm {
    pub fn validate(&self) -> Result<&str, OperationError> {
        required(&self.campaign_id, "Campaign ID is required.")
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeleteForm {
    #[serde(default)]
    pub id: String,
}

impl DeleteForm {
    pub fn validate(&self, entity: &str) -> Result<&str, OperationError> {
        let id = self.id.trim();
        if id.is_empty() {
            return Err(OperationError::validation(format!("{entity} ID is required.")));
        }
        Ok(id)
    }
}

/// A file picked in an upload form.
#[derive(Debug, Clone, Default)]
pub struct FileUpload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl FileUpload {
    /// Browsers submit an empty, unnamed part when nothing was picked.
    pub fn is_selected(&self) -> bool {
        !self.file_name.is_empty() || !self.bytes.is_empty()
    }
}

/// Exactly one selected file, or a validation error.
pub fn single_file(files: Vec<FileUpload>, missing: &str) -> Result<FileUpload, OperationError> {
    let mut selected = files.into_iter().filter(FileUpload::is_selected);
    match (selected.next(), selected.next()) {
        (Some(file), None) => Ok(file),
        (None, _) => Err(OperationError::validation(missing)),
        (Some(_), Some(_)) => Err(OperationError::validation("Select exactly one file.")),
    }
}

fn required<'a>(value: &'a str, message: &str) -> Result<&'a str, OperationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(OperationError::validation(message))
    } else {
        Ok(trimmed)
    }
}
