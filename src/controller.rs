//! The view-sync controller: one method per page intent. Each method validates
//! its input, issues at most one backend request, renders the outcome into its
//! region and, after a successful write, reloads the lists indexing that entity.

use crate::api::ApiClient;
use crate::errors::OperationError;
use crate::forms::{
    single_file, CampaignForm, DeleteForm, FileUpload, RunForm, SegmentForm, TemplateForm,
};
use crate::models::{Listed, ListItem, Region};
use crate::render::{ChartHandle, Renderer};
use crate::sequence::{FreshLists, RegionTickets, Ticket};
use crate::stats::{build_chart, build_view};
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

pub struct Controller<R> {
    api: ApiClient,
    renderer: R,
    tickets: RegionTickets,
    fresh: FreshLists,
    chart: Mutex<Option<ChartHandle>>,
}

impl<R: Renderer> Controller<R> {
    pub fn new(api: ApiClient, renderer: R) -> Self {
        Self {
            api,
            renderer,
            tickets: RegionTickets::new(),
            fresh: FreshLists::new(),
            chart: Mutex::new(None),
        }
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Page load: fill every list-backed view once. A list a write has just
    /// reloaded is skipped a single time.
    pub async fn warm_up(&self) {
        tokio::join!(
            self.warm(Region::TemplateSelect, self.refresh_templates()),
            self.warm(Region::SegmentSelect, self.refresh_segments()),
            self.warm(Region::CampaignList, self.refresh_campaigns())
        );
    }

    pub async fn upload_users(&self, files: Vec<FileUpload>) {
        let ticket = self.tickets.issue(Region::UploadResult);
        let result = match single_file(files, "Select a users file first.") {
            Ok(file) => {
                info!("uploading users file {}", file.file_name);
                self.api.upload_users(file).await
            }
            Err(err) => Err(err),
        };
        self.settle(ticket, result).await;
    }

    pub async fn upload_events(&self, files: Vec<FileUpload>) {
        let ticket = self.tickets.issue(Region::EventResult);
        let result = match single_file(files, "Select a JSONL events file first.") {
            Ok(file) => {
                info!("uploading events file {}", file.file_name);
                self.api.upload_events(file).await
            }
            Err(err) => Err(err),
        };
        self.settle(ticket, result).await;
    }

    /// Renders a failure that happened before the operation could start,
    /// such as an upload body the console could not read.
    pub async fn reject(&self, region: Region, err: OperationError) {
        let ticket = self.tickets.issue(region);
        self.settle(ticket, Err(err)).await;
    }

    pub async fn create_template(&self, form: &TemplateForm) {
        let ticket = self.tickets.issue(Region::TemplateResult);
        let result = match form.validate() {
            Ok(body) => {
                info!("creating template {}", body.id);
                self.api.create_template(&body).await
            }
            Err(err) => Err(err),
        };
        if self.settle(ticket, result).await && self.refresh_templates().await {
            self.fresh.mark(Region::TemplateSelect);
        }
    }

    pub async fn create_segment(&self, form: &SegmentForm) {
        let ticket = self.tickets.issue(Region::SegmentResult);
        let result = match form.validate() {
            Ok(body) => {
                info!("creating segment {}", body.id);
                self.api.create_segment(&body).await
            }
            Err(err) => Err(err),
        };
        if self.settle(ticket, result).await && self.refresh_segments().await {
            self.fresh.mark(Region::SegmentSelect);
        }
    }

    pub async fn create_campaign(&self, form: &CampaignForm) {
        let ticket = self.tickets.issue(Region::CampaignResult);
        let result = match form.validate() {
            Ok(body) => {
                info!("creating campaign {}", body.id);
                self.api.create_campaign(&body).await
            }
            Err(err) => Err(err),
        };
        if self.settle(ticket, result).await && self.refresh_campaigns().await {
            self.fresh.mark(Region::CampaignList);
        }
    }

    pub async fn run_campaign(&self, form: &RunForm) {
        let ticket = self.tickets.issue(Region::RunResult);
        let result = match form.validate() {
            Ok(id) => {
                info!("running campaign {id}");
                self.api.run_campaign(id).await
            }
            Err(err) => Err(err),
        };
        self.settle(ticket, result).await;
    }

    pub async fn delete_template(&self, form: &DeleteForm) {
        let ticket = self.tickets.issue(Region::TemplateResult);
        let result = match form.validate("Template") {
            Ok(id) => self.api.delete_template(id).await,
            Err(err) => Err(err),
        };
        if self.settle(ticket, result).await && self.refresh_templates().await {
            self.fresh.mark(Region::TemplateSelect);
        }
    }

    pub async fn delete_segment(&self, form: &DeleteForm) {
        let ticket = self.tickets.issue(Region::SegmentResult);
        let result = match form.validate("Segment") {
            Ok(id) => self.api.delete_segment(id).await,
            Err(err) => Err(err),
        };
        if self.settle(ticket, result).await && self.refresh_segments().await {
            self.fresh.mark(Region::SegmentSelect);
        }
    }

    pub async fn delete_campaign(&self, form: &DeleteForm) {
        let ticket = self.tickets.issue(Region::CampaignResult);
        let result = match form.validate("Campaign") {
            Ok(id) => self.api.delete_campaign(id).await,
            Err(err) => Err(err),
        };
        if self.settle(ticket, result).await && self.refresh_campaigns().await {
            self.fresh.mark(Region::CampaignList);
        }
    }

    pub async fn load_templates(&self) -> Result<(), OperationError> {
        let ticket = self.tickets.issue(Region::TemplateSelect);
        let templates = self.api.list_templates().await?;
        self.fill(ticket, templates.iter().filter_map(Listed::list_item).collect())
            .await;
        Ok(())
    }

    pub async fn load_segments(&self) -> Result<(), OperationError> {
        let ticket = self.tickets.issue(Region::SegmentSelect);
        let segments = self.api.list_segments().await?;
        self.fill(ticket, segments.iter().filter_map(Listed::list_item).collect())
            .await;
        Ok(())
    }

    pub async fn load_campaigns(&self) -> Result<(), OperationError> {
        let ticket = self.tickets.issue(Region::CampaignList);
        let campaigns = self.api.list_campaigns().await?;
        self.fill(ticket, campaigns.iter().filter_map(Listed::list_item).collect())
            .await;
        Ok(())
    }

    pub async fn load_inbound(&self) {
        let ticket = self.tickets.issue(Region::InboundList);
        match self.api.inbound_events().await {
            Ok(events) => {
                self.fill(ticket, events.iter().map(ListItem::from).collect())
                    .await
            }
            Err(err) => {
                self.settle(ticket, Err(err)).await;
            }
        }
    }

    /// Refreshes the stat fields and swaps the chart: the previous chart is
    /// disposed before the new one is mounted, under the slot lock.
    pub async fn load_stats(&self) {
        let ticket = self.tickets.issue(Region::Stats);
        let result = self.api.stats().await;

        let mut slot = self.chart.lock().await;
        if !self.tickets.is_current(&ticket) {
            debug!("dropping stale stats response");
            return;
        }
        let snapshot = match result {
            Ok(snapshot) => snapshot,
            Err(err) => {
                self.renderer
                    .render_result(Region::Stats, &err.payload(), true)
                    .await;
                return;
            }
        };

        let view = build_view(&snapshot);
        self.renderer.render_stats(&view).await;
        if let Some(previous) = slot.take() {
            self.renderer.dispose_chart(previous).await;
        }
        *slot = Some(self.renderer.mount_chart(&build_chart(&view)).await);
    }

    async fn warm(&self, list: Region, refresh: impl Future<Output = bool>) {
        if self.fresh.take(list) {
            debug!("{} reloaded by the last write, skipping", list.name());
            return;
        }
        refresh.await;
    }

    async fn refresh_templates(&self) -> bool {
        let result = self.load_templates().await;
        if let Err(err) = &result {
            warn!("template list refresh failed: {err}");
        }
        result.is_ok()
    }

    async fn refresh_segments(&self) -> bool {
        let result = self.load_segments().await;
        if let Err(err) = &result {
            warn!("segment list refresh failed: {err}");
        }
        result.is_ok()
    }

    async fn refresh_campaigns(&self) -> bool {
        let result = self.load_campaigns().await;
        if let Err(err) = &result {
            warn!("campaign list refresh failed: {err}");
        }
        result.is_ok()
    }

    /// Renders the outcome unless a newer operation claimed the region.
    /// Returns whether the operation itself succeeded.
    async fn settle(&self, ticket: Ticket, result: Result<Value, OperationError>) -> bool {
        let region = ticket.region();
        let succeeded = result.is_ok();
        if !self.tickets.is_current(&ticket) {
            debug!("dropping stale response for {}", region.name());
            return succeeded;
        }

        match result {
            Ok(body) => self.renderer.render_result(region, &body, false).await,
            Err(err) => {
                if let OperationError::Transport(message) = &err {
                    warn!("{} request failed: {message}", region.name());
                }
                self.renderer.render_result(region, &err.payload(), true).await;
            }
        }
        succeeded
    }

    async fn fill(&self, ticket: Ticket, items: Vec<ListItem>) {
        if !self.tickets.is_current(&ticket) {
            debug!("dropping stale list for {}", ticket.region().name());
            return;
        }
        self.renderer.render_list(ticket.region(), items).await;
    }
}
