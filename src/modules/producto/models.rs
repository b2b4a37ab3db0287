use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::comm::patch::{merge, nullable};
use crate::modules::audit_log::Auditable;

/// 商品库存 / Retail product with stock
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Producto {
    pub id: i64,
    pub nombre: String,
    pub descripcion: Option<String>,
    pub marca: Option<String>,
    pub categoria: Option<String>,
    pub precio: f64,
    pub costo: f64,
    pub stock: i64,
    pub stock_minimo: i64,
    pub activo: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Producto {
    pub fn bajo_stock(&self) -> bool {
        self.stock <= self.stock_minimo
    }
}

impl Auditable for Producto {
    const ENTIDAD: &'static str = "Producto";

    fn audit_id(&self) -> i64 {
        self.id
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProducto {
    #[validate(length(min = 1, max = 120, message = "el nombre es obligatorio"))]
    pub nombre: String,
    pub descripcion: Option<String>,
    pub marca: Option<String>,
    pub categoria: Option<String>,
    #[serde(default)]
    #[validate(range(min = 0.0, message = "el precio no puede ser negativo"))]
    pub precio: f64,
    #[serde(default)]
    #[validate(range(min = 0.0, message = "el costo no puede ser negativo"))]
    pub costo: f64,
    #[serde(default)]
    #[validate(range(min = 0, message = "el stock no puede ser negativo"))]
    pub stock: i64,
    #[serde(default)]
    #[validate(range(min = 0, message = "el stock mínimo no puede ser negativo"))]
    pub stock_minimo: i64,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProducto {
    #[validate(length(min = 1, max = 120, message = "el nombre no puede estar vacío"))]
    pub nombre: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub descripcion: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub marca: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub categoria: Option<Option<String>>,
    #[validate(range(min = 0.0, message = "el precio no puede ser negativo"))]
    pub precio: Option<f64>,
    #[validate(range(min = 0.0, message = "el costo no puede ser negativo"))]
    pub costo: Option<f64>,
    #[validate(range(min = 0, message = "el stock no puede ser negativo"))]
    pub stock: Option<i64>,
    #[validate(range(min = 0, message = "el stock mínimo no puede ser negativo"))]
    pub stock_minimo: Option<i64>,
    pub activo: Option<bool>,
}

impl UpdateProducto {
    pub fn apply(self, p: &mut Producto) {
        merge(&mut p.nombre, self.nombre);
        merge(&mut p.descripcion, self.descripcion);
        merge(&mut p.marca, self.marca);
        merge(&mut p.categoria, self.categoria);
        merge(&mut p.precio, self.precio);
        merge(&mut p.costo, self.costo);
        merge(&mut p.stock, self.stock);
        merge(&mut p.stock_minimo, self.stock_minimo);
        merge(&mut p.activo, self.activo);
    }
}

/// 库存调整：正数入库，负数出库
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AjusteStock {
    #[validate(range(
        min = -1_000_000,
        max = 1_000_000,
        message = "la cantidad debe estar entre -1000000 y 1000000"
    ))]
    pub cantidad: i64,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ProductoFilter {
    pub categoria: Option<String>,
    /// 仅返回 stock <= stockMinimo
    #[serde(default)]
    pub bajo_stock: bool,
    #[serde(default)]
    pub incluir_inactivos: bool,
}
