//! Plain-text rendering of products and dashboard statistics.

use crate::models::{Producto, ResumenInventario};

const EMPTY_TABLE: &str = "No hay productos registrados";
const NOT_AVAILABLE: &str = "N/A";

/// Formats an amount in soles with thousands separators: `S/ 1,234.50`.
pub fn format_currency(amount: f64) -> String {
    let sign = if amount < 0.0 { "-" } else { "" };
    let fixed = format!("{:.2}", amount.abs());
    let (integer, decimals) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (i, digit) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    format!("{sign}S/ {grouped}.{decimals}")
}

/// Stock state label shown in the product table
pub fn estado(producto: &Producto) -> &'static str {
    if producto.stock_bajo() {
        "Stock Bajo"
    } else {
        "Disponible"
    }
}

/// Renders the product table, or a placeholder line when empty.
pub fn render_productos_table(productos: &[Producto]) -> String {
    if productos.is_empty() {
        return EMPTY_TABLE.to_string();
    }

    let headers = [
        "ID", "Código", "Nombre", "Tipo", "Color", "Precio", "Stock", "Estado",
    ];
    let rows: Vec<[String; 8]> = productos
        .iter()
        .map(|p| {
            [
                p.id.to_string(),
                p.codigo.clone(),
                p.nombre.clone(),
                p.tipo_tela.clone().unwrap_or_else(|| NOT_AVAILABLE.to_string()),
                p.color.clone().unwrap_or_else(|| NOT_AVAILABLE.to_string()),
                format_currency(p.precio),
                p.stock_actual.to_string(),
                estado(p).to_string(),
            ]
        })
        .collect();

    let mut widths = headers.map(|h| h.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_row(&mut out, headers.iter().copied(), &widths);
    let separator: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_row(&mut out, separator.iter().map(String::as_str), &widths);
    for row in &rows {
        push_row(&mut out, row.iter().map(String::as_str), &widths);
    }
    out
}

fn push_row<'a>(out: &mut String, cells: impl Iterator<Item = &'a str>, widths: &[usize]) {
    let line: Vec<String> = cells
        .zip(widths)
        .map(|(cell, width)| {
            let pad = width.saturating_sub(cell.chars().count());
            format!("{cell}{}", " ".repeat(pad))
        })
        .collect();
    out.push_str(line.join(" | ").trim_end());
    out.push('\n');
}

/// Renders the three dashboard stat cards.
pub fn render_stats(resumen: &ResumenInventario) -> String {
    let valor = resumen.valor_total.parse::<f64>().unwrap_or(0.0);
    let aviso = if resumen.productos_stock_bajo > 0 {
        " (!)"
    } else {
        ""
    };

    format!(
        "Total de productos: {}\nProductos con stock bajo: {}{}\nValor total del inventario: {}\n",
        resumen.total_productos,
        resumen.productos_stock_bajo,
        aviso,
        format_currency(valor)
    )
}
