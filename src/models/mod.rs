// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    Candidate, Category, Gender, MasterProfile, MasterRow, MasterServiceEntry, MasterSummary,
    MatchCriteria, MatchRecord, MatchWeights, NewServiceRequest, Question, QuestionChoice, Region,
    Review, ScoredCandidate, Service, ServiceDetail, ServiceRequest, SubRegion,
};
pub use requests::{
    CreateServiceRequest, MatchListQuery, MatchMastersQuery, ProfileListQuery, ServiceDetailQuery,
    ServiceListQuery, UpdateDescriptionRequest, UpdateIntroductionRequest, UpdateMainServiceRequest,
};
pub use responses::{
    CreateServiceRequestResponse, ErrorResponse, HealthResponse, ListResponse,
    MatchListResponse, MatchMastersResponse, MessageResponse, ProfileListResponse, ServiceListResponse,
};
