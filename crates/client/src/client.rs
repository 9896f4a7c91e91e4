//! Typed wrapper over the HTTP API.

use chrono::NaiveDate;
use reqwest::{Client as HttpClient, Method, RequestBuilder};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::debug;

use crate::cache::EntityCache;
use crate::error::ClientError;
use domain::models::{
    Appointment, AvailabilityQuery, AvailabilityResponse, BulkSaveResponse, Client,
    DashboardSummary, DeleteResponse, Employee, ListAppointmentsQuery, SalesReport,
    SaveAppointmentsRequest, SaveClientsRequest, SaveEmployeesRequest, SaveServicesRequest,
    Service, UpsertAppointment, UpsertClient, UpsertEmployee, UpsertService,
};

const API_KEY_HEADER: &str = "X-API-Key";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Error body sent by the server on failures.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: String,
    #[serde(default)]
    message: String,
}

/// Client for one barbershop API server.
///
/// The active-record lists of clients, employees, services and the full
/// appointment list are cached after the first read. Each cache sits behind
/// its own lock, so reading one entity never waits on another.
pub struct BarbershopClient {
    http: HttpClient,
    base_url: String,
    api_key: Option<String>,
    clients: RwLock<EntityCache<Client>>,
    employees: RwLock<EntityCache<Employee>>,
    services: RwLock<EntityCache<Service>>,
    appointments: RwLock<EntityCache<Appointment>>,
}

impl BarbershopClient {
    /// Client for `base_url` (e.g. `http://127.0.0.1:5000`) without an API key.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        Self::with_options(base_url, None, DEFAULT_TIMEOUT)
    }

    pub fn with_options(
        base_url: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, ClientError> {
        let http = HttpClient::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
            clients: RwLock::default(),
            employees: RwLock::default(),
            services: RwLock::default(),
            appointments: RwLock::default(),
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let request = self
            .http
            .request(method, format!("{}{}", self.base_url, path));
        match &self.api_key {
            Some(key) => request.header(API_KEY_HEADER, key),
            None => request,
        }
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ClientError> {
        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body: ErrorBody = response.json().await.unwrap_or_default();
            return Err(ClientError::Api {
                status: status.as_u16(),
                code: body.error,
                message: body.message,
            });
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::Decode(e.to_string()))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        self.send(self.request(Method::GET, path)).await
    }

    async fn get_query<T, Q>(&self, path: &str, query: &Q) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        self.send(self.request(Method::GET, path).query(query)).await
    }

    async fn post_json<B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<BulkSaveResponse, ClientError> {
        self.send(self.request(Method::POST, path).json(body)).await
    }

    async fn delete(&self, path: &str) -> Result<(), ClientError> {
        let _: DeleteResponse = self.send(self.request(Method::DELETE, path)).await?;
        Ok(())
    }

    /// Serves `cache` or fills it from `path`.
    async fn cached<T>(
        &self,
        cache: &RwLock<EntityCache<T>>,
        path: &str,
    ) -> Result<Vec<T>, ClientError>
    where
        T: DeserializeOwned + Clone,
    {
        if let Some(items) = cache.read().await.get() {
            return Ok(items.to_vec());
        }

        let mut guard = cache.write().await;
        // Another task may have filled it while we waited for the lock.
        if let Some(items) = guard.get() {
            return Ok(items.to_vec());
        }

        let items: Vec<T> = self.get_json(path).await?;
        debug!(path, count = items.len(), "Cache filled");
        guard.store(items.clone());
        Ok(items)
    }

    /// Drops every cached list.
    pub async fn invalidate_all(&self) {
        self.clients.write().await.invalidate();
        self.employees.write().await.invalidate();
        self.services.write().await.invalidate();
        self.appointments.write().await.invalidate();
    }

    /// Whether the server and its database answer.
    pub async fn health(&self) -> Result<bool, ClientError> {
        let response = self.request(Method::GET, "/api/health").send().await?;
        Ok(response.status().is_success())
    }

    // Clients

    pub async fn clients(&self) -> Result<Vec<Client>, ClientError> {
        self.cached(&self.clients, "/api/clients").await
    }

    pub async fn client(&self, id: i64) -> Result<Client, ClientError> {
        self.get_json(&format!("/api/clients/{id}")).await
    }

    pub async fn save_clients(&self, clients: Vec<UpsertClient>) -> Result<Vec<i64>, ClientError> {
        let saved = self
            .post_json("/api/clients", &SaveClientsRequest { clients })
            .await;
        self.clients.write().await.invalidate();
        Ok(saved?.ids)
    }

    pub async fn delete_client(&self, id: i64) -> Result<(), ClientError> {
        let result = self.delete(&format!("/api/clients/{id}")).await;
        self.clients.write().await.invalidate();
        result
    }

    // Employees

    pub async fn employees(&self) -> Result<Vec<Employee>, ClientError> {
        self.cached(&self.employees, "/api/employees").await
    }

    pub async fn employee(&self, id: i64) -> Result<Employee, ClientError> {
        self.get_json(&format!("/api/employees/{id}")).await
    }

    pub async fn save_employees(
        &self,
        employees: Vec<UpsertEmployee>,
    ) -> Result<Vec<i64>, ClientError> {
        let saved = self
            .post_json("/api/employees", &SaveEmployeesRequest { employees })
            .await;
        self.employees.write().await.invalidate();
        Ok(saved?.ids)
    }

    pub async fn delete_employee(&self, id: i64) -> Result<(), ClientError> {
        let result = self.delete(&format!("/api/employees/{id}")).await;
        self.employees.write().await.invalidate();
        result
    }

    // Services

    pub async fn services(&self) -> Result<Vec<Service>, ClientError> {
        self.cached(&self.services, "/api/services").await
    }

    pub async fn service(&self, id: i64) -> Result<Service, ClientError> {
        self.get_json(&format!("/api/services/{id}")).await
    }

    pub async fn save_services(
        &self,
        services: Vec<UpsertService>,
    ) -> Result<Vec<i64>, ClientError> {
        let saved = self
            .post_json("/api/services", &SaveServicesRequest { services })
            .await;
        self.services.write().await.invalidate();
        Ok(saved?.ids)
    }

    pub async fn delete_service(&self, id: i64) -> Result<(), ClientError> {
        let result = self.delete(&format!("/api/services/{id}")).await;
        self.services.write().await.invalidate();
        result
    }

    // Appointments

    /// Every appointment, cached.
    pub async fn appointments(&self) -> Result<Vec<Appointment>, ClientError> {
        self.cached(&self.appointments, "/api/appointments").await
    }

    /// Filtered listing, always fetched fresh.
    pub async fn find_appointments(
        &self,
        query: &ListAppointmentsQuery,
    ) -> Result<Vec<Appointment>, ClientError> {
        self.get_query("/api/appointments", query).await
    }

    pub async fn appointment(&self, id: i64) -> Result<Appointment, ClientError> {
        self.get_json(&format!("/api/appointments/{id}")).await
    }

    /// Books or edits appointments. A slot clash comes back as an
    /// [`ClientError::Api`] with status 409 and nothing is stored.
    pub async fn save_appointments(
        &self,
        appointments: Vec<UpsertAppointment>,
    ) -> Result<Vec<i64>, ClientError> {
        let saved = self
            .post_json("/api/appointments", &SaveAppointmentsRequest { appointments })
            .await;
        self.appointments.write().await.invalidate();
        Ok(saved?.ids)
    }

    pub async fn delete_appointment(&self, id: i64) -> Result<(), ClientError> {
        let result = self.delete(&format!("/api/appointments/{id}")).await;
        self.appointments.write().await.invalidate();
        result
    }

    pub async fn availability(
        &self,
        query: &AvailabilityQuery,
    ) -> Result<AvailabilityResponse, ClientError> {
        self.get_query("/api/availability", query).await
    }

    // Reporting

    pub async fn dashboard(&self, date: Option<NaiveDate>) -> Result<DashboardSummary, ClientError> {
        match date {
            Some(date) => {
                self.get_query("/api/dashboard", &[("date", date.to_string())])
                    .await
            }
            None => self.get_json("/api/dashboard").await,
        }
    }

    pub async fn sales_report(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<SalesReport, ClientError> {
        let query = [("from", from.to_string()), ("to", to.to_string())];
        self.get_query("/api/reports/sales", &query).await
    }
}
