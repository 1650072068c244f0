//! Repositorio de rutas persistidas
//!
//! Este módulo maneja la tabla `get_route_with_step`: verificación de esquema
//! y upsert por lotes. El upsert es todo-o-nada: un único fallo revierte el
//! lote completo.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, info};

use crate::models::persisted_route::PersistedRoute;
use crate::utils::errors::StorageError;

/// Esquema de la tabla destino; idempotente, seguro de ejecutar en cada pasada
const CREATE_TABLE_SQL: &str = r#"
    CREATE TABLE IF NOT EXISTS get_route_with_step (
        id BIGSERIAL PRIMARY KEY,
        route_id BIGINT NOT NULL UNIQUE,
        name VARCHAR(255),
        number_of_legs INTEGER,
        departure_place VARCHAR(255),
        arrival_place VARCHAR(255),
        code VARCHAR(50),
        time_stamp TIMESTAMPTZ,
        user_name VARCHAR(100),
        metros DOUBLE PRECISION,
        segundos DOUBLE PRECISION,
        steps JSONB,
        state INTEGER DEFAULT 1,
        create_at TIMESTAMPTZ DEFAULT CURRENT_TIMESTAMP,
        update_at TIMESTAMPTZ DEFAULT CURRENT_TIMESTAMP
    )
"#;

/// Inserta o actualiza por `route_id`. En conflicto se sobreescribe todo
/// campo persistido excepto `create_at`; `update_at` se refresca siempre.
const UPSERT_SQL: &str = r#"
    INSERT INTO get_route_with_step
        (route_id, name, number_of_legs, departure_place, arrival_place, code,
         time_stamp, user_name, metros, segundos, steps, state, create_at, update_at)
    VALUES
        ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
    ON CONFLICT (route_id) DO UPDATE SET
        name = EXCLUDED.name,
        number_of_legs = EXCLUDED.number_of_legs,
        departure_place = EXCLUDED.departure_place,
        arrival_place = EXCLUDED.arrival_place,
        code = EXCLUDED.code,
        time_stamp = EXCLUDED.time_stamp,
        user_name = EXCLUDED.user_name,
        metros = EXCLUDED.metros,
        segundos = EXCLUDED.segundos,
        steps = EXCLUDED.steps,
        state = EXCLUDED.state,
        update_at = EXCLUDED.update_at
"#;

/// Operaciones de persistencia que necesita el pipeline
#[async_trait]
pub trait RouteRepository: Send + Sync {
    /// Crea la tabla destino si no existe
    async fn ensure_schema(&self) -> Result<bool, StorageError>;

    /// Upsert transaccional del lote; `true` si al menos un registro fue
    /// afectado
    async fn upsert_many(&self, routes: &[PersistedRoute]) -> Result<bool, StorageError>;
}

/// Implementación PostgreSQL del repositorio de rutas
pub struct PgRouteRepository {
    pool: PgPool,
}

impl PgRouteRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RouteRepository for PgRouteRepository {
    async fn ensure_schema(&self) -> Result<bool, StorageError> {
        sqlx::query(CREATE_TABLE_SQL).execute(&self.pool).await?;

        info!("Tabla get_route_with_step verificada/creada exitosamente");
        Ok(true)
    }

    async fn upsert_many(&self, routes: &[PersistedRoute]) -> Result<bool, StorageError> {
        info!(
            "Intentando insertar o actualizar {} rutas en la base de datos",
            routes.len()
        );

        // La transacción se revierte al soltarse si cualquier upsert falla;
        // ningún registro del lote queda visible en ese caso.
        let mut tx = self.pool.begin().await?;
        let mut affected: u64 = 0;

        for route in routes {
            let result = sqlx::query(UPSERT_SQL)
                .bind(route.route_id)
                .bind(&route.name)
                .bind(route.number_of_legs)
                .bind(&route.departure_place)
                .bind(&route.arrival_place)
                .bind(&route.code)
                .bind(route.time_stamp)
                .bind(&route.user_name)
                .bind(route.metros)
                .bind(route.segundos)
                .bind(&route.steps)
                .bind(route.state)
                .bind(route.create_at)
                .bind(route.update_at)
                .execute(&mut *tx)
                .await?;

            debug!(
                "Upsert de ruta {}: {} registros afectados",
                route.route_id,
                result.rows_affected()
            );
            affected += result.rows_affected();
        }

        tx.commit().await?;

        info!(
            "Operación de inserción/actualización completada. {} registros afectados",
            affected
        );
        Ok(affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::persisted_route::STATE_ACTIVE;
    use crate::models::route_template::{Location, Step, TimingInfo};
    use chrono::Utc;
    use sqlx::types::Json;

    #[test]
    fn upsert_overwrites_everything_except_create_at() {
        let update_clause = UPSERT_SQL
            .split("DO UPDATE SET")
            .nth(1)
            .expect("upsert must have a DO UPDATE clause");

        assert!(!update_clause.contains("create_at"));
        assert!(update_clause.contains("update_at = EXCLUDED.update_at"));
        assert!(update_clause.contains("metros = EXCLUDED.metros"));
        assert!(update_clause.contains("segundos = EXCLUDED.segundos"));
        assert!(update_clause.contains("steps = EXCLUDED.steps"));
    }

    #[test]
    fn schema_declares_route_id_as_unique_business_key() {
        assert!(CREATE_TABLE_SQL.contains("route_id BIGINT NOT NULL UNIQUE"));
        assert!(CREATE_TABLE_SQL.contains("IF NOT EXISTS"));
    }

    fn sample_route(route_id: i64, name: &str) -> PersistedRoute {
        let now = Utc::now();
        PersistedRoute {
            route_id,
            name: name.to_string(),
            number_of_legs: 1,
            departure_place: "Madrid".to_string(),
            arrival_place: "Valencia".to_string(),
            code: "MAD-VAL".to_string(),
            time_stamp: now,
            user_name: "operador1".to_string(),
            metros: 352000.5,
            segundos: 13500.0,
            steps: Json(vec![Step {
                id: 1,
                starts: Location {
                    place_id: 1,
                    address: "Calle Mayor 1".to_string(),
                    client_id: 10,
                },
                arrive: Location {
                    place_id: 2,
                    address: "Av. del Puerto 5".to_string(),
                    client_id: 11,
                },
                times: TimingInfo {
                    mileage: 352000.5,
                    duration: 13500,
                    breaks: Some(900),
                },
            }]),
            state: STATE_ACTIVE,
            create_at: now,
            update_at: now,
        }
    }

    async fn test_pool() -> PgPool {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for DB tests");
        PgPool::connect(&url).await.expect("failed to connect")
    }

    async fn read_back(pool: &PgPool, route_id: i64) -> PersistedRoute {
        sqlx::query_as(
            "SELECT route_id, name, number_of_legs, departure_place, arrival_place, code, \
             time_stamp, user_name, metros, segundos, steps, state, create_at, update_at \
             FROM get_route_with_step WHERE route_id = $1",
        )
        .bind(route_id)
        .fetch_one(pool)
        .await
        .expect("route should be present")
    }

    #[tokio::test]
    #[ignore] // requiere una base PostgreSQL accesible via DATABASE_URL
    async fn upsert_twice_is_idempotent_except_update_at() {
        let pool = test_pool().await;
        let repo = PgRouteRepository::new(pool.clone());
        repo.ensure_schema().await.unwrap();

        let route_id = 910_001;
        sqlx::query("DELETE FROM get_route_with_step WHERE route_id = $1")
            .bind(route_id)
            .execute(&pool)
            .await
            .unwrap();

        let first = sample_route(route_id, "Madrid - Valencia");
        assert!(repo.upsert_many(std::slice::from_ref(&first)).await.unwrap());
        let after_first = read_back(&pool, route_id).await;

        // Misma ruta mapeada en una pasada posterior: create_at nuevo que el
        // upsert debe descartar, update_at nuevo que debe conservar.
        let mut second = sample_route(route_id, "Madrid - Valencia");
        second.create_at = Utc::now();
        second.update_at = Utc::now();
        assert!(repo.upsert_many(std::slice::from_ref(&second)).await.unwrap());
        let after_second = read_back(&pool, route_id).await;

        assert_eq!(after_second.create_at, after_first.create_at);
        assert!(after_second.update_at > after_first.update_at);
        assert_eq!(after_second.steps, after_first.steps);
        assert_eq!(after_second.metros, after_first.metros);

        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM get_route_with_step WHERE route_id = $1")
                .bind(route_id)
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    #[ignore] // requiere una base PostgreSQL accesible via DATABASE_URL
    async fn failed_batch_leaves_no_partial_writes() {
        let pool = test_pool().await;
        let repo = PgRouteRepository::new(pool.clone());
        repo.ensure_schema().await.unwrap();

        let good_id = 910_002;
        let bad_id = 910_003;
        sqlx::query("DELETE FROM get_route_with_step WHERE route_id IN ($1, $2)")
            .bind(good_id)
            .bind(bad_id)
            .execute(&pool)
            .await
            .unwrap();

        let good = sample_route(good_id, "Sevilla - Granada");
        // name supera el límite VARCHAR(255) y fuerza un fallo a mitad de lote
        let bad = sample_route(bad_id, &"x".repeat(300));

        let result = repo.upsert_many(&[good, bad]).await;
        assert!(result.is_err());

        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM get_route_with_step WHERE route_id IN ($1, $2)",
        )
        .bind(good_id)
        .bind(bad_id)
        .fetch_one(&pool)
        .await
        .unwrap();
        assert_eq!(count, 0);
    }
}
