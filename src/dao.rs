//! The dao module holds everything which talks to PostgreSQL: the pool, the per-request session
//! and the rows which come back out of the queries.
use log::*;
use sqlx::postgres::{PgPool, PgPoolOptions, Postgres};
use sqlx::Transaction;
use uuid::Uuid;

use crate::config::Config;

#[derive(Clone, Debug, sqlx::FromRow)]
pub struct PollRow {
    pub id: Uuid,
    pub text: String,
}

/**
 * One row of the poll tally join, one per answer.
 *
 * A poll without answers still produces a single row from the left join, with the answer
 * columns all NULL.
 */
#[derive(Clone, Debug, sqlx::FromRow)]
pub struct TallyRow {
    pub poll_id: Uuid,
    pub poll_text: String,
    pub answer_id: Option<Uuid>,
    pub answer_text: Option<String>,
    pub votes: i64,
}

/**
 * Handle on the connection pool, cheap to clone into the tide state
 */
#[derive(Clone, Debug)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /**
     * Create the pool and make sure at least one connection can be established
     */
    pub async fn connect(config: &Config) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect(&config.database_url)
            .await?;
        Ok(Self { pool })
    }

    /**
     * Create the pool without connecting, connections are opened on first use
     */
    pub fn connect_lazy(config: &Config) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect_lazy(&config.database_url)?;
        Ok(Self { pool })
    }

    pub async fn migrate(&self) -> Result<(), sqlx::migrate::MigrateError> {
        info!("Running database migrations");
        sqlx::migrate!().run(&self.pool).await
    }

    /**
     * Acquire a connection from the pool and open a transaction on it
     */
    pub async fn session(&self) -> Result<Session, sqlx::Error> {
        let tx = self.pool.begin().await?;
        Ok(Session { tx })
    }
}

/**
 * A single request's unit of work.
 *
 * Nothing is persisted until `commit` is called. Dropping a session without committing rolls
 * the transaction back, and either way the connection goes back to the pool.
 */
pub struct Session {
    tx: Transaction<'static, Postgres>,
}

impl Session {
    pub async fn commit(self) -> Result<(), sqlx::Error> {
        self.tx.commit().await
    }

    pub async fn insert_poll(&mut self, text: &str) -> Result<Uuid, sqlx::Error> {
        sqlx::query_scalar::<_, Uuid>("INSERT INTO poll (text) VALUES ($1) RETURNING id")
            .bind(text)
            .fetch_one(&mut self.tx)
            .await
    }

    pub async fn insert_answers(&mut self, poll_id: Uuid, answers: &[String]) -> Result<(), sqlx::Error> {
        /*
         * sqlx has no executemany, so each answer gets its own insert inside the transaction
         */
        for answer in answers.iter() {
            sqlx::query("INSERT INTO answer (poll_id, text) VALUES ($1, $2)")
                .bind(poll_id)
                .bind(answer)
                .execute(&mut self.tx)
                .await?;
        }
        Ok(())
    }

    pub async fn polls(&mut self) -> Result<Vec<PollRow>, sqlx::Error> {
        sqlx::query_as::<_, PollRow>("SELECT poll.id, poll.text FROM poll")
            .fetch_all(&mut self.tx)
            .await
    }

    pub async fn poll_tally(&mut self, poll_id: Uuid) -> Result<Vec<TallyRow>, sqlx::Error> {
        sqlx::query_as::<_, TallyRow>(
            "SELECT poll.id AS poll_id, poll.text AS poll_text, \
                    answer.id AS answer_id, answer.text AS answer_text, \
                    COUNT(vote.id) AS votes \
             FROM poll \
             LEFT JOIN answer ON poll.id = answer.poll_id \
             LEFT JOIN vote ON answer.id = vote.answer_id \
             WHERE poll.id = $1 \
             GROUP BY poll.id, answer.id",
        )
        .bind(poll_id)
        .fetch_all(&mut self.tx)
        .await
    }

    pub async fn insert_vote(&mut self, answer_id: Uuid) -> Result<(), sqlx::Error> {
        sqlx::query("INSERT INTO vote (answer_id) VALUES ($1)")
            .bind(answer_id)
            .execute(&mut self.tx)
            .await?;
        Ok(())
    }
}
