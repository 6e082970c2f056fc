//! The routes module contains all the tide routes and the logic to fulfill the responses for each
//! route.
//!
//! Every handler opens its own session, and only commits once the work has succeeded. Any early
//! return drops the session which rolls the transaction back.
use tide::{Request, StatusCode};
use uuid::Uuid;

use crate::dao::Database;

/**
 * Struct for carrying application state into tide request handlers
 */
#[derive(Clone, Debug)]
pub struct AppState {
    pub db: Database,
}

/**
 * Construct the tide server with every route wired up
 */
pub fn app(state: AppState) -> tide::Server<AppState> {
    let mut app = tide::with_state(state);
    app.at("/polls").post(polls::create);
    app.at("/polls").get(polls::list);
    app.at("/polls/:poll_uuid").get(polls::get);
    app.at("/vote/:answer_uuid").post(vote::cast);
    app
}

/**
 * Pull a UUID out of the named route parameter, anything unparseable is a bad request
 */
fn uuid_param(req: &Request<AppState>, name: &str) -> Result<Uuid, tide::Error> {
    req.param::<Uuid>(name)
        .map_err(|_| tide::Error::from_str(StatusCode::BadRequest, "Invalid uuid specified"))
}

pub mod polls {
    use log::*;
    use tide::{Body, Request, StatusCode};

    use crate::json::{PollCreateRequest, PollResponse, PollSummary};
    use crate::AppState;

    /**
    *  POST /polls
    */
    pub async fn create(mut req: Request<AppState>) -> Result<Body, tide::Error> {
        let poll = req.body_json::<PollCreateRequest>().await?;
        debug!("Poll received: {:?}", poll);

        let mut session = req.state().db.session().await?;
        let poll_id = session.insert_poll(&poll.text).await?;
        session.insert_answers(poll_id, &poll.answers).await?;
        session.commit().await?;

        info!("Created poll {} with {} answers", poll_id, poll.answers.len());
        Body::from_json(&poll_id)
    }

    /**
    *  GET /polls
    */
    pub async fn list(req: Request<AppState>) -> Result<Body, tide::Error> {
        let mut session = req.state().db.session().await?;
        let rows = session.polls().await?;
        session.commit().await?;

        let polls: Vec<PollSummary> = rows.into_iter().map(PollSummary::from).collect();
        Body::from_json(&polls)
    }

    /**
    * GET /polls/:poll_uuid
    */
    pub async fn get(req: Request<AppState>) -> Result<Body, tide::Error> {
        let poll_id = super::uuid_param(&req, "poll_uuid")?;
        debug!("Fetching poll: {}", poll_id);

        let mut session = req.state().db.session().await?;
        let rows = session.poll_tally(poll_id).await?;
        session.commit().await?;

        match PollResponse::from_rows(rows) {
            Some(poll) => Body::from_json(&poll),
            None => {
                debug!("No poll found for {}", poll_id);
                Err(tide::Error::from_str(StatusCode::NotFound, "Poll not found"))
            }
        }
    }
}

pub mod vote {
    use log::*;
    use tide::{Request, Response, StatusCode};

    use crate::AppState;

    /**
    *  POST /vote/:answer_uuid
    *
    *  An unknown answer is rejected by the foreign key on insert and surfaces as a 500
    */
    pub async fn cast(req: Request<AppState>) -> Result<Response, tide::Error> {
        let answer_id = super::uuid_param(&req, "answer_uuid")?;

        let mut session = req.state().db.session().await?;
        if let Err(err) = session.insert_vote(answer_id).await {
            error!("Failed to vote for {}: {:?}", answer_id, err);
            return Err(err.into());
        }
        session.commit().await?;

        Ok(Response::new(StatusCode::NoContent))
    }
}
