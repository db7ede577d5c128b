use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Identity of a backend entity. The backend answers with `_id`, some
/// deployments with `id`; either one is accepted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityKey {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, rename = "_id", skip_serializing_if = "Option::is_none")]
    pub mongo_id: Option<String>,
}

impl EntityKey {
    pub fn value(&self) -> Option<&str> {
        self.id
            .as_deref()
            .or(self.mongo_id.as_deref())
            .filter(|id| !id.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    #[serde(flatten)]
    pub key: EntityKey,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    #[serde(flatten)]
    pub key: EntityKey,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default)]
    pub rule: Value,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CampaignStatus {
    #[default]
    Scheduled,
    Running,
    Paused,
    Completed,
    Done,
    Failed,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Campaign {
    #[serde(flatten)]
    pub key: EntityKey,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default, alias = "templateId")]
    pub template_id: Option<String>,
    #[serde(default, alias = "segmentId")]
    pub segment_id: Option<String>,
    #[serde(default)]
    pub status: CampaignStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    #[serde(default, alias = "totalUsers")]
    pub total_users: u64,
    #[serde(default, alias = "optOuts")]
    pub opt_outs: u64,
    #[serde(default)]
    pub sent: u64,
    #[serde(default)]
    pub failed: u64,
    #[serde(default, alias = "deliveryPct")]
    pub delivery_pct: f64,
    #[serde(default, alias = "failedPct")]
    pub failed_pct: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundEvent {
    #[serde(default)]
    pub from: String,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub command: Option<String>,
}

impl InboundEvent {
    pub fn line(&self) -> String {
        format!(
            "{}: {} ({})",
            self.from,
            self.body.as_deref().unwrap_or_default(),
            self.command.as_deref().unwrap_or_default()
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTemplate {
    pub id: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewSegment {
    pub id: String,
    pub name: String,
    pub topic: String,
    pub rule: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCampaign {
    pub id: String,
    pub name: String,
    pub topic: String,
    pub template_id: String,
    pub segment_id: String,
    pub status: CampaignStatus,
}

/// One option of a dropdown or one line of a list region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListItem {
    pub value: String,
    pub label: String,
}

impl ListItem {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }

    fn keyed(key: &EntityKey, name: Option<&str>) -> Option<Self> {
        let value = key.value()?;
        let label = name.filter(|name| !name.is_empty()).unwrap_or(value);
        Some(Self::new(value, label))
    }
}

impl From<&InboundEvent> for ListItem {
    fn from(event: &InboundEvent) -> Self {
        Self::new(event.from.clone(), event.line())
    }
}

/// Entities that can back a dropdown. Entries without an id are skipped.
pub trait Listed {
    fn list_item(&self) -> Option<ListItem>;
}

impl Listed for Template {
    fn list_item(&self) -> Option<ListItem> {
        ListItem::keyed(&self.key, self.name.as_deref())
    }
}

impl Listed for Segment {
    fn list_item(&self) -> Option<ListItem> {
        ListItem::keyed(&self.key, self.name.as_deref())
    }
}

impl Listed for Campaign {
    fn list_item(&self) -> Option<ListItem> {
        ListItem::keyed(&self.key, self.name.as_deref())
    }
}

/// Named page regions the controller writes into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Region {
    UploadResult,
    EventResult,
    TemplateResult,
    SegmentResult,
    CampaignResult,
    RunResult,
    TemplateSelect,
    SegmentSelect,
    CampaignList,
    InboundList,
    Stats,
}

impl Region {
    pub const ALL: [Region; 11] = [
        Region::UploadResult,
        Region::EventResult,
        Region::TemplateResult,
        Region::SegmentResult,
        Region::CampaignResult,
        Region::RunResult,
        Region::TemplateSelect,
        Region::SegmentSelect,
        Region::CampaignList,
        Region::InboundList,
        Region::Stats,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Region::UploadResult => "upload_result",
            Region::EventResult => "event_result",
            Region::TemplateResult => "template_result",
            Region::SegmentResult => "segment_result",
            Region::CampaignResult => "campaign_result",
            Region::RunResult => "run_result",
            Region::TemplateSelect => "template_select",
            Region::SegmentSelect => "segment_select",
            Region::CampaignList => "campaign_list",
            Region::InboundList => "inbound_list",
            Region::Stats => "stats",
        }
    }
}
