//! Endpoint wrappers that drive the loading indicator and alerts.

use std::collections::HashMap;
use std::sync::Arc;

use crate::client::ui::{AlertKind, ClientUi};
use crate::client::validation::{producto_rules, validate_form};
use crate::client::{ApiClient, ClientError};
use crate::handlers::productos::CrearProductoRequest;
use crate::handlers::types::ApiResponse;
use crate::models::{Producto, ResumenInventario};

/// Alert shown after a product is created
pub const CREATE_SUCCESS_MESSAGE: &str = "Producto creado exitosamente";

type LoadingGuard = scopeguard::ScopeGuard<Arc<dyn ClientUi>, fn(Arc<dyn ClientUi>)>;

fn stop_loading(ui: Arc<dyn ClientUi>) {
    ui.set_loading(false);
}

/// Shows the loading indicator until the returned guard drops.
fn loading(ui: &Arc<dyn ClientUi>) -> LoadingGuard {
    ui.set_loading(true);
    scopeguard::guard(Arc::clone(ui), stop_loading as fn(Arc<dyn ClientUi>))
}

fn report<T>(ui: &dyn ClientUi, result: Result<T, ClientError>) -> Result<T, ClientError> {
    if let Err(e) = &result {
        ui.alert(&e.to_string(), AlertKind::Error);
    }
    result
}

/// Product endpoints
#[derive(Clone)]
pub struct ProductosApi {
    client: ApiClient,
    ui: Arc<dyn ClientUi>,
}

impl ProductosApi {
    pub fn new(client: ApiClient, ui: Arc<dyn ClientUi>) -> Self {
        Self { client, ui }
    }

    pub async fn get_all(&self) -> Result<Vec<Producto>, ClientError> {
        let _loading = loading(&self.ui);
        let result = self
            .client
            .get::<ApiResponse<Vec<Producto>>>("/api/productos")
            .await
            .map(|r| r.data);
        report(self.ui.as_ref(), result)
    }

    /// Fetches one product; does not toggle the loading indicator.
    pub async fn get_by_id(&self, id: i32) -> Result<Producto, ClientError> {
        let result = self
            .client
            .get::<ApiResponse<Producto>>(&format!("/api/productos/{id}"))
            .await
            .map(|r| r.data);
        report(self.ui.as_ref(), result)
    }

    pub async fn create(&self, producto: &CrearProductoRequest) -> Result<Producto, ClientError> {
        let _loading = loading(&self.ui);
        let result = self
            .client
            .post::<_, ApiResponse<Producto>>("/api/productos", producto)
            .await
            .map(|r| r.data);
        if result.is_ok() {
            self.ui.alert(CREATE_SUCCESS_MESSAGE, AlertKind::Success);
        }
        report(self.ui.as_ref(), result)
    }

    /// Runs the product form rules, returning every failure message.
    pub fn validate(&self, form: &HashMap<String, String>) -> Vec<String> {
        validate_form(form, &producto_rules())
    }
}

/// Inventory endpoints
#[derive(Clone)]
pub struct InventarioApi {
    client: ApiClient,
    ui: Arc<dyn ClientUi>,
}

impl InventarioApi {
    pub fn new(client: ApiClient, ui: Arc<dyn ClientUi>) -> Self {
        Self { client, ui }
    }

    pub async fn get_resumen(&self) -> Result<ResumenInventario, ClientError> {
        let _loading = loading(&self.ui);
        let result = self
            .client
            .get::<ApiResponse<ResumenInventario>>("/api/inventario")
            .await
            .map(|r| r.data);
        report(self.ui.as_ref(), result)
    }
}
