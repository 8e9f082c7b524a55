//! Terminal front end for the inventory API.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use inventario_textil::client::{
    ApiClient, AlertKind, ClientUi, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_MS, InventarioApi,
    ProductosApi, TerminalUi, render, report, validation,
};
use inventario_textil::handlers::productos::CrearProductoRequest;
use serde_json::Value;

/// Client for the textile inventory API
#[derive(Parser, Debug)]
#[command(name = "inventario-cli")]
#[command(version, about, long_about = None)]
struct Args {
    /// Base URL of the API
    #[arg(long, env = "INVENTARIO_API_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Request timeout in milliseconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_MS)]
    timeout_ms: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List every product
    Listar,
    /// Show one product
    Ver { id: i32 },
    /// Register a new product
    Crear {
        #[arg(long)]
        codigo: String,
        #[arg(long)]
        nombre: String,
        #[arg(long)]
        precio: String,
        #[arg(long)]
        tipo_tela: Option<String>,
        #[arg(long)]
        color: Option<String>,
        #[arg(long)]
        stock_actual: Option<i32>,
        #[arg(long)]
        stock_minimo: Option<i32>,
    },
    /// Show the inventory summary
    Resumen,
    /// Write the inventory report to a text file
    Reporte {
        /// Output directory
        #[arg(long, default_value = ".")]
        salida: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let client = ApiClient::new(&args.base_url, Duration::from_millis(args.timeout_ms))
        .context("building API client")?;
    let ui: Arc<dyn ClientUi> = Arc::new(TerminalUi::new());
    let productos = ProductosApi::new(client.clone(), Arc::clone(&ui));
    let inventario = InventarioApi::new(client, Arc::clone(&ui));

    match args.command {
        Command::Listar => {
            let lista = productos.get_all().await?;
            print!("{}", render::render_productos_table(&lista));
        }
        Command::Ver { id } => {
            let producto = productos.get_by_id(id).await?;
            println!("{}", serde_json::to_string_pretty(&producto)?);
        }
        Command::Crear {
            codigo,
            nombre,
            precio,
            tipo_tela,
            color,
            stock_actual,
            stock_minimo,
        } => {
            let form = validation::producto_form(&codigo, &nombre, &precio);
            let errores = productos.validate(&form);
            if !errores.is_empty() {
                for error in &errores {
                    ui.alert(error, AlertKind::Warning);
                }
                anyhow::bail!("el formulario tiene {} errores", errores.len());
            }

            let request = CrearProductoRequest {
                codigo: Some(form["codigo"].clone()),
                nombre: Some(form["nombre"].clone()),
                tipo_tela,
                color,
                precio: Some(Value::String(form["precio"].clone())),
                stock_actual: stock_actual.map(Value::from),
                stock_minimo: stock_minimo.map(Value::from),
            };
            let creado = productos.create(&request).await?;
            println!("{}", serde_json::to_string_pretty(&creado)?);
        }
        Command::Resumen => {
            let resumen = inventario.get_resumen().await?;
            print!("{}", render::render_stats(&resumen));
            if !resumen.productos_con_stock_bajo.is_empty() {
                println!();
                println!("Productos con stock bajo:");
                for p in &resumen.productos_con_stock_bajo {
                    println!(
                        "  {} - {} ({} / mín {})",
                        p.codigo, p.nombre, p.stock_actual, p.stock_minimo
                    );
                }
            }
        }
        Command::Reporte { salida } => {
            ui.alert("Generando reporte...", AlertKind::Info);
            let lista = productos.get_all().await?;
            let resumen = inventario.get_resumen().await?;

            let fecha = Local::now().date_naive();
            let texto = report::generate_report_text(fecha, &resumen, &lista);
            let path = report::write_report(&salida, fecha, &texto)
                .with_context(|| format!("writing report to {}", salida.display()))?;

            ui.alert(
                &format!("Reporte generado en {}", path.display()),
                AlertKind::Success,
            );
        }
    }

    Ok(())
}
