//! Plain-text inventory report.

use std::fmt::Write as _;
use std::io;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::models::{Producto, ResumenInventario};

/// Report file name for `fecha`: `reporte-inventario-YYYY-MM-DD.txt`
pub fn report_file_name(fecha: NaiveDate) -> String {
    format!("reporte-inventario-{}.txt", fecha.format("%Y-%m-%d"))
}

/// Builds the report body from the summary and the full product list.
pub fn generate_report_text(
    fecha: NaiveDate,
    resumen: &ResumenInventario,
    productos: &[Producto],
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "REPORTE DE INVENTARIO TEXTIL");
    let _ = writeln!(out, "============================");
    let _ = writeln!(out, "Fecha: {}", fecha.format("%d/%m/%Y"));
    let _ = writeln!(out, "Total de Productos: {}", resumen.total_productos);
    let _ = writeln!(out, "Valor Total: S/ {}", resumen.valor_total);
    let _ = writeln!(
        out,
        "Productos con Stock Bajo: {}",
        resumen.productos_stock_bajo
    );
    let _ = writeln!(out);
    let _ = writeln!(out, "DETALLE DE PRODUCTOS:");

    for (index, p) in productos.iter().enumerate() {
        let _ = writeln!(out);
        let _ = writeln!(out, "{}. {} - {}", index + 1, p.codigo, p.nombre);
        let _ = writeln!(out, "   Tipo: {}", p.tipo_tela.as_deref().unwrap_or("N/A"));
        let _ = writeln!(out, "   Color: {}", p.color.as_deref().unwrap_or("N/A"));
        let _ = writeln!(out, "   Precio: S/ {:.2}", p.precio);
        let _ = writeln!(
            out,
            "   Stock: {} (Mín: {})",
            p.stock_actual, p.stock_minimo
        );
        let estado = if p.stock_bajo() {
            "STOCK BAJO"
        } else {
            "DISPONIBLE"
        };
        let _ = writeln!(out, "   Estado: {estado}");
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "---");
    out.push_str("Generado por Sistema de Inventario Textil");
    out
}

/// Writes `text` into `dir` under the dated report name and returns the path.
pub fn write_report(dir: &Path, fecha: NaiveDate, text: &str) -> io::Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(report_file_name(fecha));
    std::fs::write(&path, text)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn fecha() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
    }

    fn producto(codigo: &str, stock_actual: i32) -> Producto {
        Producto {
            id: 1,
            codigo: codigo.to_string(),
            nombre: "Algodón Blanco Premium".to_string(),
            tipo_tela: Some("Algodón".to_string()),
            color: None,
            precio: 25.5,
            stock_actual,
            stock_minimo: 10,
            fecha_creacion: Utc::now().fixed_offset(),
        }
    }

    fn resumen() -> ResumenInventario {
        ResumenInventario {
            total_productos: 2,
            productos_stock_bajo: 1,
            valor_total: "2754.00".to_string(),
            productos_con_stock_bajo: Vec::new(),
        }
    }

    #[test]
    fn test_report_file_name() {
        assert_eq!(report_file_name(fecha()), "reporte-inventario-2024-01-15.txt");
    }

    #[test]
    fn test_report_text() {
        let text = generate_report_text(
            fecha(),
            &resumen(),
            &[producto("TEL001", 100), producto("TEL009", 8)],
        );

        assert!(text.starts_with("REPORTE DE INVENTARIO TEXTIL\n"));
        assert!(text.contains("Fecha: 15/01/2024"));
        assert!(text.contains("Valor Total: S/ 2754.00"));
        assert!(text.contains("1. TEL001 - Algodón Blanco Premium"));
        assert!(text.contains("2. TEL009"));
        assert!(text.contains("   Color: N/A"));
        assert!(text.contains("   Stock: 8 (Mín: 10)\n   Estado: STOCK BAJO"));
        assert!(text.contains("   Estado: DISPONIBLE"));
        assert!(text.ends_with("Generado por Sistema de Inventario Textil"));
    }

    #[test]
    fn test_write_report() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_report(dir.path(), fecha(), "contenido").unwrap();

        assert_eq!(path.file_name().unwrap(), "reporte-inventario-2024-01-15.txt");
        assert_eq!(std::fs::read_to_string(path).unwrap(), "contenido");
    }
}
