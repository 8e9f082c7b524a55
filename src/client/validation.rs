//! Form validation run before a request is sent.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

pub const CODIGO_MIN_LENGTH: usize = 3;
pub const CODIGO_MAX_LENGTH: usize = 20;
pub const NOMBRE_MIN_LENGTH: usize = 3;
pub const PRECIO_MIN: f64 = 0.01;

static CODIGO_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z0-9]+$").expect("literal pattern compiles"));

/// Constraints for one form field
#[derive(Debug, Clone, Default)]
pub struct FieldRule {
    pub field: &'static str,
    /// Name used in messages
    pub label: &'static str,
    pub required: bool,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    /// Minimum numeric value
    pub min: Option<f64>,
    pub pattern: Option<Regex>,
}

impl FieldRule {
    pub fn new(field: &'static str, label: &'static str) -> Self {
        Self {
            field,
            label,
            ..Self::default()
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn min_length(mut self, n: usize) -> Self {
        self.min_length = Some(n);
        self
    }

    pub fn max_length(mut self, n: usize) -> Self {
        self.max_length = Some(n);
        self
    }

    pub fn min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    pub fn pattern(mut self, pattern: Regex) -> Self {
        self.pattern = Some(pattern);
        self
    }

    fn check(&self, value: Option<&str>, errors: &mut Vec<String>) {
        let label = self.label;
        let value = match value {
            Some(v) if !v.trim().is_empty() => v,
            Some(v) if !self.required && !v.is_empty() => v,
            _ => {
                if self.required {
                    errors.push(format!("{label} es obligatorio"));
                }
                return;
            }
        };

        let length = value.chars().count();
        if let Some(min) = self.min_length
            && length < min
        {
            errors.push(format!("{label} debe tener al menos {min} caracteres"));
        }
        if let Some(max) = self.max_length
            && length > max
        {
            errors.push(format!("{label} no puede tener más de {max} caracteres"));
        }
        if let Some(min) = self.min {
            match value.trim().parse::<f64>() {
                Ok(n) if n >= min => {}
                Ok(_) => errors.push(format!("{label} debe ser mayor a {min}")),
                Err(_) => errors.push(format!("{label} debe ser un número válido")),
            }
        }
        if let Some(pattern) = &self.pattern
            && !pattern.is_match(value)
        {
            errors.push(format!("{label} tiene un formato inválido"));
        }
    }
}

/// Checks `form` against `rules`, returning every failure message in rule order.
///
/// A blank required field reports only that it is mandatory.
pub fn validate_form(form: &HashMap<String, String>, rules: &[FieldRule]) -> Vec<String> {
    let mut errors = Vec::new();
    for rule in rules {
        rule.check(form.get(rule.field).map(String::as_str), &mut errors);
    }
    errors
}

/// Rules applied to the product creation form
pub fn producto_rules() -> Vec<FieldRule> {
    vec![
        FieldRule::new("codigo", "Código")
            .required()
            .min_length(CODIGO_MIN_LENGTH)
            .max_length(CODIGO_MAX_LENGTH)
            .pattern(CODIGO_PATTERN.clone()),
        FieldRule::new("nombre", "Nombre")
            .required()
            .min_length(NOMBRE_MIN_LENGTH),
        FieldRule::new("precio", "Precio").required().min(PRECIO_MIN),
    ]
}

/// Builds the product form the way it is typed in: `codigo` trimmed and
/// upper-cased, `nombre` and `precio` trimmed.
pub fn producto_form(codigo: &str, nombre: &str, precio: &str) -> HashMap<String, String> {
    HashMap::from([
        ("codigo".to_string(), codigo.trim().to_uppercase()),
        ("nombre".to_string(), nombre.trim().to_string()),
        ("precio".to_string(), precio.trim().to_string()),
    ])
}
