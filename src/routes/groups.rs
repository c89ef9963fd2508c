use actix_web::{web, HttpResponse, Responder};
use std::sync::Arc;
use validator::Validate;

use crate::core::{meets_requirements, run_preview, Clusterer, EngineError};
use crate::models::{
    AddFamilyRequest, AddMeetingRequest, AddPersonRequest, CheckGroupResponse, ErrorResponse,
    Family, HealthResponse, Meeting, Person, PreviewGroupingResponse, RoleCounts,
    RunGroupingRequest, RunGroupingResponse,
};
use crate::services::{GroupRepository, InMemoryRepository, RepositoryError};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub repository: Arc<tokio::sync::Mutex<InMemoryRepository>>,
}

/// Configure all grouping-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/people", web::post().to(add_person))
        .route("/meetings", web::post().to(add_meeting))
        .route("/families", web::post().to(add_family))
        .route("/groups/run", web::post().to(run_grouping))
        .route("/groups/preview", web::post().to(preview_grouping))
        .route("/groups/{group_id}/check", web::get().to(check_group));
}

fn validation_error(errors: validator::ValidationErrors) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse {
        error: "Validation failed".to_string(),
        message: errors.to_string(),
        status_code: 400,
    })
}

fn repository_error(e: RepositoryError) -> HttpResponse {
    match e {
        RepositoryError::NotFound(_) => HttpResponse::NotFound().json(ErrorResponse {
            error: "Not found".to_string(),
            message: e.to_string(),
            status_code: 404,
        }),
        RepositoryError::Conflict(_) => HttpResponse::Conflict().json(ErrorResponse {
            error: "Conflict".to_string(),
            message: e.to_string(),
            status_code: 409,
        }),
    }
}

/// Health check endpoint
async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Register a person
///
/// POST /api/v1/people
async fn add_person(
    state: web::Data<AppState>,
    req: web::Json<AddPersonRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for add_person request: {:?}", errors);
        return validation_error(errors);
    }

    let req = req.into_inner();
    let person = Person {
        person_id: req.person_id,
        name: req.name,
        latitude: req.latitude,
        longitude: req.longitude,
        elder: req.elder,
        servant: req.servant,
        pioneer: req.pioneer,
        leader: req.leader,
        helper: req.helper,
        publisher: req.publisher,
        family_head: req.family_head,
        family_id: req.family_id,
        group_id: None,
    };

    let mut repo = state.repository.lock().await;
    match repo.add_person(person) {
        Ok(()) => HttpResponse::Created().finish(),
        Err(e) => repository_error(e),
    }
}

/// Register a meeting point
///
/// POST /api/v1/meetings
async fn add_meeting(
    state: web::Data<AppState>,
    req: web::Json<AddMeetingRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for add_meeting request: {:?}", errors);
        return validation_error(errors);
    }

    let req = req.into_inner();
    let meeting = Meeting {
        meeting_id: req.meeting_id,
        name: req.name,
        latitude: req.latitude,
        longitude: req.longitude,
        group_id: None,
    };

    let mut repo = state.repository.lock().await;
    match repo.add_meeting(meeting) {
        Ok(()) => HttpResponse::Created().finish(),
        Err(e) => repository_error(e),
    }
}

/// Register or replace a family's member list
///
/// POST /api/v1/families
async fn add_family(
    state: web::Data<AppState>,
    req: web::Json<AddFamilyRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for add_family request: {:?}", errors);
        return validation_error(errors);
    }

    let req = req.into_inner();
    let mut repo = state.repository.lock().await;
    repo.upsert_family(Family {
        family_id: req.family_id,
        member_person_ids: req.member_person_ids,
    });
    HttpResponse::Ok().finish()
}

/// Run the clustering engine in commit mode
///
/// POST /api/v1/groups/run
///
/// Request body (all fields optional, overriding stored configuration):
/// ```json
/// {
///   "distanceThresholdKm": 2.0,
///   "minGroupSize": 3,
///   "maxGroupSize": 20,
///   "keepFamiliesTogether": true,
///   "assignMeetingPoints": true
/// }
/// ```
async fn run_grouping(
    state: web::Data<AppState>,
    req: web::Json<RunGroupingRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for run_grouping request: {:?}", errors);
        return validation_error(errors);
    }

    let overrides = req.overrides();

    // The repository stays locked for the whole run; the engine assumes no
    // concurrent mutators.
    let mut repo = state.repository.lock().await;
    let mut clusterer = Clusterer::new();

    match clusterer.run(&mut *repo, &overrides) {
        Ok(outcome) => {
            tracing::info!("Committed {} groups", outcome.created_groups.len());
            HttpResponse::Ok().json(RunGroupingResponse {
                created_groups: outcome.created_groups,
                statistics: outcome.statistics,
            })
        }
        Err(EngineError::Configuration(message)) => {
            HttpResponse::BadRequest().json(ErrorResponse {
                error: "Invalid configuration".to_string(),
                message,
                status_code: 400,
            })
        }
        Err(e) => {
            tracing::error!("Clustering run failed: {}", e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Clustering run failed".to_string(),
                message: e.to_string(),
                status_code: 500,
            })
        }
    }
}

/// Run the clustering engine in preview mode
///
/// POST /api/v1/groups/preview
///
/// Same body as /groups/run. All repository changes are rolled back before
/// the response is produced; the returned groups describe what a commit
/// would have created.
async fn preview_grouping(
    state: web::Data<AppState>,
    req: web::Json<RunGroupingRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for preview_grouping request: {:?}", errors);
        return validation_error(errors);
    }

    let overrides = req.overrides();

    let mut repo = state.repository.lock().await;
    let mut clusterer = Clusterer::new();
    let outcome = run_preview(&mut clusterer, &mut *repo, &overrides);

    HttpResponse::Ok().json(PreviewGroupingResponse {
        success: outcome.success,
        created_groups: outcome.created_groups,
        statistics: outcome.statistics,
        error: outcome.error,
    })
}

/// Re-validate an existing group's member set against the stored quotas
///
/// GET /api/v1/groups/{group_id}/check
async fn check_group(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> impl Responder {
    let group_id = path.into_inner();
    let repo = state.repository.lock().await;

    if repo.group(&group_id).is_none() {
        return HttpResponse::NotFound().json(ErrorResponse {
            error: "Not found".to_string(),
            message: format!("group {} does not exist", group_id),
            status_code: 404,
        });
    }

    let members = repo.persons_in_group(&group_id);
    let requirements = match repo.requirements() {
        Ok(req) => req,
        Err(e) => {
            tracing::error!("Failed to load requirements: {}", e);
            return HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to load requirements".to_string(),
                message: e.to_string(),
                status_code: 500,
            });
        }
    };

    let satisfied = meets_requirements(&members, &requirements);

    HttpResponse::Ok().json(CheckGroupResponse {
        group_id,
        satisfied,
        member_count: members.len(),
        roles: RoleCounts::tally(&members),
    })
}
