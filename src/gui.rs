//! Desktop form: pick a file, name the table, preview the data and save
//! the generated script.
//!
//! Loading runs on a worker thread that reports back over a channel; the
//! script itself is regenerated on the UI thread whenever the table name or
//! options change, since generation is cheap and pure.

use crate::theme;
use eframe::egui;
use egui_extras::{Column as TableColumn, TableBuilder};
use rfd::FileDialog;
use serde::{Deserialize, Serialize};
use sheetsql::config::AppSettings;
use sheetsql::error::{Result, SheetSqlError, user_facing_error};
use sheetsql::generator::{
    Conversion, ConversionRequest, Dataset, IdentifierStyle, SUPPORTED_EXTENSIONS, SqlScript,
    Value, ValuePolicy, convert_file_flow, script_for, sql_type_for, write_script,
};
use std::path::PathBuf;

type ConversionReceiver = crossbeam_channel::Receiver<Result<Conversion>>;

#[derive(Default)]
enum Status {
    #[default]
    Idle,
    Saved(PathBuf),
    Failed(String),
}

#[derive(Default, Deserialize, Serialize)]
#[serde(default)]
pub struct SqlScriptApp {
    settings: AppSettings,
    table_name: String,
    #[serde(skip)]
    conversion: Option<Conversion>,
    #[serde(skip)]
    script: Option<SqlScript>,
    /// Request the current `script` was generated from
    #[serde(skip)]
    generated_for: Option<ConversionRequest>,
    #[serde(skip)]
    receiver: Option<ConversionReceiver>,
    #[serde(skip)]
    loading_file: Option<PathBuf>,
    /// Whether the file being loaded has its headers standardised
    #[serde(skip)]
    loading_standardised: bool,
    /// Whether the loaded dataset has its headers standardised
    #[serde(skip)]
    dataset_standardised: bool,
    #[serde(skip)]
    show_full_dataset: bool,
    #[serde(skip)]
    status: Status,
}

impl SqlScriptApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        theme::apply_theme(&cc.egui_ctx);

        if let Some(storage) = cc.storage
            && let Some(app) = eframe::get_value::<Self>(storage, eframe::APP_KEY)
        {
            return app;
        }

        let settings = sheetsql::config::load_app_config();
        Self {
            table_name: settings.default_table_name.clone(),
            settings,
            ..Default::default()
        }
    }

    fn request(&self) -> ConversionRequest {
        let table_name = self.table_name.trim();
        ConversionRequest {
            table_name: (!table_name.is_empty()).then(|| table_name.to_owned()),
            options: self.settings.script_options(),
            standardise_column_names: self.settings.standardise_column_names,
        }
    }

    fn start_conversion(&mut self, path: PathBuf, ctx: &egui::Context) {
        if !sheetsql::generator::io::is_supported(&path) {
            let ext = sheetsql::generator::io::file_extension(&path);
            self.status = Status::Failed(user_facing_error(&SheetSqlError::UnsupportedFormat(ext)));
            return;
        }

        let (tx, rx) = crossbeam_channel::bounded(1);
        let request = self.request();
        let worker_request = request.clone();
        let ctx = ctx.clone();
        let worker_path = path.clone();

        std::thread::spawn(move || {
            let result = convert_file_flow(&worker_path, &worker_request);
            if tx.send(result).is_err() {
                tracing::error!("Failed to send conversion result");
            }
            ctx.request_repaint();
        });

        self.receiver = Some(rx);
        self.loading_file = Some(path);
        self.loading_standardised = request.standardise_column_names;
        self.status = Status::Idle;
    }

    fn handle_receiver(&mut self) {
        let result = self.receiver.as_ref().and_then(|rx| rx.try_recv().ok());
        let Some(result) = result else {
            return;
        };

        self.receiver = None;
        self.loading_file = None;
        match result {
            Ok(conversion) => self.accept_conversion(conversion),
            Err(e) => {
                tracing::warn!("Conversion failed: {e}");
                self.conversion = None;
                self.script = None;
                self.status = Status::Failed(user_facing_error(&e));
            }
        }
    }

    fn accept_conversion(&mut self, conversion: Conversion) {
        let mut request = self.request();
        request.standardise_column_names = self.loading_standardised;
        self.dataset_standardised = self.loading_standardised;

        // The worker used the form as it was when loading started.
        match script_for(&conversion.dataset, &request) {
            Ok(script) => self.script = Some(script),
            Err(e) => {
                self.script = None;
                self.status = Status::Failed(user_facing_error(&e));
            }
        }
        self.generated_for = Some(request);
        self.conversion = Some(conversion);
        self.show_full_dataset = false;
    }

    /// Header standardisation happens while loading, so toggling it reloads the file.
    fn needs_reload(&self) -> bool {
        self.receiver.is_none()
            && self.conversion.is_some()
            && self.dataset_standardised != self.settings.standardise_column_names
    }

    /// Regenerates the script if the table name or script options changed.
    fn refresh_script(&mut self) {
        let Some(conversion) = &self.conversion else {
            return;
        };
        let request = self.request();
        if self.generated_for.as_ref().is_some_and(|prev| {
            prev.table_name == request.table_name && prev.options == request.options
        }) {
            return;
        }

        match script_for(&conversion.dataset, &request) {
            Ok(script) => {
                self.script = Some(script);
                if matches!(self.status, Status::Failed(_)) {
                    self.status = Status::Idle;
                }
            }
            Err(e) => {
                self.script = None;
                self.status = Status::Failed(user_facing_error(&e));
            }
        }
        self.generated_for = Some(request);
    }

    fn save_script(&mut self) {
        let Some(script) = &self.script else {
            return;
        };
        let Some(path) = FileDialog::new()
            .set_file_name(script.file_name())
            .add_filter("SQL", &["sql"])
            .save_file()
        else {
            return;
        };

        self.status = match write_script(script, &path) {
            Ok(path) => Status::Saved(path),
            Err(e) => Status::Failed(user_facing_error(&e)),
        };
    }

    fn save_defaults(&mut self) {
        let table_name = self.table_name.trim();
        if !table_name.is_empty() {
            self.settings.default_table_name = table_name.to_owned();
        }
        if let Err(e) = sheetsql::config::save_app_config(&self.settings) {
            tracing::warn!("Failed to save settings: {e:#}");
            self.status = Status::Failed(format!("Failed to save settings: {e:#}"));
        }
    }

    fn render_sidebar(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        ui.label(
            egui::RichText::new("Upload Your File")
                .heading()
                .color(theme::HEADING_COLOR),
        );
        ui.add_space(theme::SPACING_SMALL);

        ui.add_enabled_ui(self.receiver.is_none(), |ui| {
            if ui.button("Choose an Excel or CSV file...").clicked()
                && let Some(path) = FileDialog::new()
                    .add_filter("Excel or CSV", &SUPPORTED_EXTENSIONS[..])
                    .pick_file()
            {
                self.start_conversion(path, ctx);
            }
        });
        ui.small("or drop a .xlsx, .xls or .csv file onto the window");

        ui.add_space(theme::SPACING_LARGE);
        ui.label(egui::RichText::new("Enter Table Name:").strong().color(theme::LABEL_COLOR));
        ui.text_edit_singleline(&mut self.table_name);

        ui.add_space(theme::SPACING_LARGE);
        ui.collapsing("Script options", |ui| {
            egui::ComboBox::from_label("Values")
                .selected_text(self.settings.value_policy.label())
                .show_ui(ui, |ui| {
                    for policy in ValuePolicy::ALL {
                        ui.selectable_value(&mut self.settings.value_policy, policy, policy.label());
                    }
                });

            egui::ComboBox::from_label("Identifiers")
                .selected_text(self.settings.identifier_style.label())
                .show_ui(ui, |ui| {
                    for style in [IdentifierStyle::Bare, IdentifierStyle::Backtick] {
                        ui.selectable_value(&mut self.settings.identifier_style, style, style.label());
                    }
                });

            let mut batched = self.settings.rows_per_insert.is_some();
            ui.checkbox(&mut batched, "Split INSERT into batches");
            self.settings.rows_per_insert = if batched {
                let mut n = self.settings.rows_per_insert.unwrap_or(1000);
                ui.add(egui::DragValue::new(&mut n).range(1..=1_000_000).suffix(" rows"));
                Some(n)
            } else {
                None
            };

            ui.checkbox(
                &mut self.settings.standardise_column_names,
                "Standardise column names",
            )
            .on_hover_text("Reloads the current file");

            ui.add_space(theme::SPACING_SMALL);
            if ui
                .button("Save as defaults")
                .on_hover_text("Also used by the command line")
                .clicked()
            {
                self.save_defaults();
            }
        });

        if let Ok(path) = sheetsql::logging::get_current_log_path() {
            ui.add_space(theme::SPACING_LARGE);
            ui.small(format!("Log file: {}", path.display()));
        }
    }

    fn render_main(&mut self, ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            ui.label(
                egui::RichText::new("Generate SQL Script from Excel or CSV File")
                    .heading()
                    .strong()
                    .color(theme::ACCENT_COLOR),
            );
            ui.label("Easily convert your Excel or CSV data into SQL CREATE and INSERT scripts!");
        });
        ui.add_space(theme::SPACING_MEDIUM);

        match &self.status {
            Status::Idle => {}
            Status::Saved(path) => {
                ui.label(format!("Saved {}", path.display()));
            }
            Status::Failed(msg) => {
                ui.colored_label(theme::ERROR_COLOR, msg);
            }
        }

        if let Some(path) = &self.loading_file {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label(format!("Processing your file... ({})", path.display()));
            });
            return;
        }

        let Some(conversion) = &self.conversion else {
            if !matches!(self.status, Status::Failed(_)) {
                ui.label("Please upload an Excel or CSV file to get started.");
            }
            return;
        };

        let mut download = false;
        egui::ScrollArea::vertical()
            .auto_shrink([false; 2])
            .show(ui, |ui| {
                let dataset = &conversion.dataset;

                section_heading(ui, "Data Preview");
                ui.label(format!(
                    "{} ({} columns, {} rows, {:.2} MB, read in {:.2}s)",
                    conversion.file_path.display(),
                    dataset.width(),
                    dataset.height(),
                    conversion.file_size as f64 / 1_048_576.0,
                    conversion.duration.as_secs_f32()
                ));
                theme::card_frame().show(ui, |ui| {
                    render_data_table(ui, "preview_table", dataset, dataset.head(self.settings.preview_rows));
                });

                ui.checkbox(&mut self.show_full_dataset, "Show Full Dataset")
                    .on_hover_text("Expand to view the full dataset");
                if self.show_full_dataset {
                    theme::card_frame().show(ui, |ui| {
                        render_data_table(ui, "full_table", dataset, dataset.rows());
                    });
                }

                ui.add_space(theme::SPACING_LARGE);
                section_heading(ui, "Generated SQL Script");
                if let Some(script) = &self.script {
                    let text = script.text();
                    ui.add(
                        egui::TextEdit::multiline(&mut text.as_str())
                            .code_editor()
                            .desired_width(f32::INFINITY)
                            .desired_rows(12),
                    );

                    ui.add_space(theme::SPACING_SMALL);
                    download = ui
                        .button(format!("Download SQL File ({})", script.file_name()))
                        .on_hover_text(script.content_type())
                        .clicked();
                }
            });

        if download {
            self.save_script();
        }
    }
}

fn section_heading(ui: &mut egui::Ui, text: &str) {
    ui.label(
        egui::RichText::new(text)
            .heading()
            .color(theme::HEADING_COLOR),
    );
}

fn render_data_table(ui: &mut egui::Ui, id: &str, dataset: &Dataset, rows: &[Vec<Value>]) {
    egui::ScrollArea::horizontal().id_salt(id).show(ui, |ui| {
        TableBuilder::new(ui)
            .id_salt(id)
            .striped(true)
            .vscroll(true)
            .max_scroll_height(320.0)
            .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
            .columns(TableColumn::auto().at_least(60.0), dataset.width())
            .header(36.0, |mut header| {
                for column in dataset.columns() {
                    header.col(|ui| {
                        ui.vertical(|ui| {
                            ui.strong(&column.name);
                            ui.small(sql_type_for(column.kind));
                        });
                    });
                }
            })
            .body(|body| {
                body.rows(18.0, rows.len(), |mut row| {
                    let Some(values) = rows.get(row.index()) else {
                        return;
                    };
                    for value in values {
                        row.col(|ui| {
                            if value.is_missing() {
                                ui.weak("NULL");
                            } else {
                                ui.label(value.to_display_string());
                            }
                        });
                    }
                });
            });
    });
}

impl eframe::App for SqlScriptApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_receiver();

        let dropped = ctx.input(|i| i.raw.dropped_files.iter().find_map(|f| f.path.clone()));
        if let Some(path) = dropped
            && self.receiver.is_none()
        {
            self.start_conversion(path, ctx);
        }

        if self.needs_reload()
            && let Some(path) = self.conversion.as_ref().map(|c| c.file_path.clone())
        {
            self.start_conversion(path, ctx);
        }

        self.refresh_script();

        egui::SidePanel::left("upload_panel")
            .frame(theme::sidebar_frame())
            .resizable(false)
            .default_width(260.0)
            .show(ctx, |ui| self.render_sidebar(ui, ctx));

        egui::CentralPanel::default().show(ctx, |ui| self.render_main(ui));
    }

    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, eframe::APP_KEY, self);
    }
}
