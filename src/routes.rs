use crate::{
    api::{advisory, audit, department, employee, holiday, leave_request, reimbursement},
    auth::middleware::auth_middleware,
    config::Config,
};
use actix_governor::{
    Governor, GovernorConfig, GovernorConfigBuilder, PeerIpKeyExtractor,
    governor::middleware::NoOpMiddleware,
};
use actix_web::{middleware::from_fn, web};

pub fn configure(cfg: &mut web::ServiceConfig, config: Config) {
    // Helper to build per-scope limiter config
    fn limiter(requests_per_min: u32) -> GovernorConfig<PeerIpKeyExtractor, NoOpMiddleware> {
        let per_ms = if requests_per_min == 0 {
            1
        } else {
            60_000 / requests_per_min as u64
        };
        GovernorConfigBuilder::default()
            .per_millisecond(per_ms)
            .burst_size(requests_per_min)
            .key_extractor(PeerIpKeyExtractor)
            .finish()
            .unwrap()
    }

    let submit_limiter = limiter(config.rate_submit_per_min);
    let advisory_limiter = limiter(config.rate_advisory_per_min);
    let protected_limiter = limiter(config.rate_protected_per_min);

    // Protected routes. Token issuance lives with the identity service;
    // everything here only verifies.
    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(from_fn(auth_middleware))
            .wrap(Governor::new(&protected_limiter))
            .service(
                web::scope("/leave")
                    .wrap(Governor::new(&submit_limiter))
                    // /leave
                    .service(
                        web::resource("")
                            .route(web::get().to(leave_request::leave_list))
                            .route(web::post().to(leave_request::create_leave)),
                    )
                    // /leave/expire-sweep (before /{id} so the literal wins)
                    .service(
                        web::resource("/expire-sweep")
                            .route(web::put().to(leave_request::expire_sweep)),
                    )
                    // /leave/{id}
                    .service(web::resource("/{id}").route(web::get().to(leave_request::get_leave)))
                    // /leave/{id}/approve
                    .service(
                        web::resource("/{id}/approve")
                            .route(web::put().to(leave_request::approve_leave)),
                    )
                    // /leave/{id}/reject
                    .service(
                        web::resource("/{id}/reject")
                            .route(web::put().to(leave_request::reject_leave)),
                    )
                    // /leave/{id}/cancel
                    .service(
                        web::resource("/{id}/cancel")
                            .route(web::put().to(leave_request::cancel_leave)),
                    ),
            )
            .service(
                web::scope("/claims")
                    .wrap(Governor::new(&submit_limiter))
                    .service(
                        web::resource("")
                            .route(web::get().to(reimbursement::claim_list))
                            .route(web::post().to(reimbursement::create_claim)),
                    )
                    .service(
                        web::resource("/{id}").route(web::get().to(reimbursement::get_claim)),
                    )
                    .service(
                        web::resource("/{id}/approve")
                            .route(web::put().to(reimbursement::approve_claim)),
                    )
                    .service(
                        web::resource("/{id}/reject")
                            .route(web::put().to(reimbursement::reject_claim)),
                    )
                    .service(
                        web::resource("/{id}/cancel")
                            .route(web::put().to(reimbursement::cancel_claim)),
                    ),
            )
            .service(
                web::scope("/advisory")
                    .wrap(Governor::new(&advisory_limiter))
                    .service(
                        web::resource("/burnout/{employee_id}")
                            .route(web::get().to(advisory::get_burnout)),
                    )
                    .service(
                        web::resource("/team/{manager_id}")
                            .route(web::get().to(advisory::get_team_burnout)),
                    )
                    .service(web::resource("/advice").route(web::post().to(advisory::get_advice)))
                    .service(
                        web::resource("/suggestions/{employee_id}")
                            .route(web::get().to(advisory::get_suggestions)),
                    )
                    .service(
                        web::resource("/parse").route(web::post().to(advisory::parse_leave_text)),
                    ),
            )
            .service(
                web::scope("/employees")
                    .service(
                        web::resource("")
                            .route(web::post().to(employee::create_employee))
                            .route(web::get().to(employee::list_employees)),
                    )
                    .service(web::resource("/{id}").route(web::get().to(employee::get_employee)))
                    .service(
                        web::resource("/{id}/balance").route(web::get().to(employee::get_balance)),
                    ),
            )
            .service(
                web::scope("/departments").service(
                    web::resource("")
                        .route(web::post().to(department::create_department))
                        .route(web::get().to(department::list_departments)),
                ),
            )
            .service(
                web::scope("/holidays").service(
                    web::resource("")
                        .route(web::post().to(holiday::create_holiday))
                        .route(web::get().to(holiday::list_holidays)),
                ),
            )
            .service(
                web::scope("/audit")
                    .service(web::resource("").route(web::get().to(audit::audit_list))),
            ),
    );
}
