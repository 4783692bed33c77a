//! The facility-data subset of the API, as a trait the orchestrator can be
//! driven through.

use std::future::Future;

use petmap_core::{District, Facility, FacilityId};

use crate::client::ApiClient;
use crate::error::ClientError;
use crate::types::{FilterRequest, SearchRequest};

/// Facility data source used by the view orchestrator.
pub trait FacilityBackend: Send + Sync {
    fn districts(&self) -> impl Future<Output = Result<Vec<District>, ClientError>> + Send;

    fn search(
        &self,
        request: &SearchRequest,
    ) -> impl Future<Output = Result<Vec<Facility>, ClientError>> + Send;

    fn filter(
        &self,
        request: &FilterRequest,
    ) -> impl Future<Output = Result<Vec<Facility>, ClientError>> + Send;

    fn facility(
        &self,
        id: &FacilityId,
    ) -> impl Future<Output = Result<Facility, ClientError>> + Send;
}

impl FacilityBackend for ApiClient {
    fn districts(&self) -> impl Future<Output = Result<Vec<District>, ClientError>> + Send {
        ApiClient::districts(self)
    }

    fn search(
        &self,
        request: &SearchRequest,
    ) -> impl Future<Output = Result<Vec<Facility>, ClientError>> + Send {
        ApiClient::search(self, request)
    }

    fn filter(
        &self,
        request: &FilterRequest,
    ) -> impl Future<Output = Result<Vec<Facility>, ClientError>> + Send {
        ApiClient::filter(self, request)
    }

    fn facility(
        &self,
        id: &FacilityId,
    ) -> impl Future<Output = Result<Facility, ClientError>> + Send {
        ApiClient::facility(self, id)
    }
}
