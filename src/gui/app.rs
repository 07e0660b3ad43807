use std::{
    error::Error,
    sync::{Arc, Mutex, MutexGuard},
};

use chrono::Local;
use eframe::egui;
use tokio::runtime::Runtime;

use super::form::{cause_list_path, Notice, SearchForm};
use crate::{
    assembler::ResultAssembler,
    output::{to_pretty_json, write_json},
};

pub fn run(options: eframe::NativeOptions, assembler: ResultAssembler) -> Result<(), Box<dyn Error>> {
    let runtime = Runtime::new()?;
    eframe::run_native(
        "eCourts Scraper",
        options,
        Box::new(move |_cc| Ok(Box::new(App::new(runtime, assembler)))),
    )?;
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tab {
    Search,
    CauseList,
}

// Written by background tasks, read by the UI thread
#[derive(Debug, Default)]
struct Shared {
    output: String,
    status: String,
    running: bool,
    notice: Option<Notice>,
}

pub struct App {
    runtime: Runtime,
    assembler: ResultAssembler,
    tab: Tab,
    form: SearchForm,
    cause_list_path: String,
    shared: Arc<Mutex<Shared>>,
}

impl App {
    pub fn new(runtime: Runtime, assembler: ResultAssembler) -> Self {
        let shared = Shared {
            status: "Idle".to_string(),
            ..Shared::default()
        };

        Self {
            runtime,
            assembler,
            tab: Tab::Search,
            form: SearchForm::default(),
            cause_list_path: String::new(),
            shared: Arc::new(Mutex::new(shared)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Shared> {
        lock_shared(&self.shared)
    }

    fn notify(&self, notice: Notice) {
        self.lock().notice = Some(notice);
    }

    fn run_search(&mut self, ctx: &egui::Context) {
        let (query, options) = match self.form.request() {
            Ok(request) => request,
            Err(e) => {
                self.notify(Notice::new("Input Error", e.to_string()));
                return;
            }
        };

        {
            let mut shared = self.lock();
            shared.running = true;
            shared.status = format!("Searching {}", query.label());
        }

        let assembler = self.assembler.clone();
        let shared = self.shared.clone();
        let ctx = ctx.clone();
        self.runtime.spawn(async move {
            let output = assembler.run(&query, &options).await;
            let text = to_pretty_json(&output)
                .unwrap_or_else(|e| format!("Failed to render result: {}", e));

            {
                let mut shared = lock_shared(&shared);
                shared.output = text;
                shared.running = false;
                shared.status = "Ready".to_string();
            }
            ctx.request_repaint();
        });
    }

    fn download_cause_list(&mut self, ctx: &egui::Context) {
        let path = match cause_list_path(&self.cause_list_path) {
            Ok(path) => path,
            Err(notice) => {
                self.notify(notice);
                return;
            }
        };

        {
            let mut shared = self.lock();
            shared.running = true;
            shared.status = "Fetching cause list".to_string();
        }

        let assembler = self.assembler.clone();
        let shared = self.shared.clone();
        let ctx = ctx.clone();
        self.runtime.spawn(async move {
            let today = Local::now().date_naive();
            let attempt = assembler.extractor().cause_list_links(Some(today)).await;

            let notice = match write_json(&path, &attempt) {
                Ok(()) => Notice::new("Done", format!("Cause list saved -> {}", path.display())),
                Err(e) => Notice::new("Error", e.to_string()),
            };

            {
                let mut shared = lock_shared(&shared);
                shared.notice = Some(notice);
                shared.running = false;
                shared.status = "Ready".to_string();
            }
            ctx.request_repaint();
        });
    }

    fn search_tab(&mut self, ui: &mut egui::Ui) {
        ui.group(|ui| {
            ui.label("Search by CNR");
            ui.horizontal(|ui| {
                ui.add(egui::TextEdit::singleline(&mut self.form.cnr).desired_width(240.0));
                ui.label("CNR Number");
            });
        });

        ui.group(|ui| {
            ui.label("Search by Case");
            ui.horizontal(|ui| {
                for field in [
                    &mut self.form.case_type,
                    &mut self.form.number,
                    &mut self.form.year,
                ] {
                    ui.add(egui::TextEdit::singleline(field).desired_width(80.0));
                }
                ui.label("Type  Number  Year");
            });
        });

        ui.horizontal(|ui| {
            ui.checkbox(&mut self.form.today, "Today");
            ui.checkbox(&mut self.form.tomorrow, "Tomorrow");
            ui.checkbox(&mut self.form.download_pdf, "Download PDF");
        });

        let running = self.lock().running;
        if ui
            .add_enabled(!running, egui::Button::new("Run Search"))
            .clicked()
        {
            self.run_search(ui.ctx());
        }

        ui.separator();

        let output = self.lock().output.clone();
        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.add(
                    egui::TextEdit::multiline(&mut output.as_str())
                        .code_editor()
                        .desired_width(f32::INFINITY),
                );
            });
    }

    fn cause_list_tab(&mut self, ui: &mut egui::Ui) {
        ui.label("Download Entire Cause List (Today)");
        ui.add_space(8.0);

        let running = self.lock().running;
        ui.horizontal(|ui| {
            ui.add(
                egui::TextEdit::singleline(&mut self.cause_list_path)
                    .hint_text("cause_list.json")
                    .desired_width(360.0),
            );
            if ui
                .add_enabled(!running, egui::Button::new("Download"))
                .clicked()
            {
                self.download_cause_list(ui.ctx());
            }
        });
    }

    fn notice_window(&mut self, ctx: &egui::Context) {
        let Some(notice) = self.lock().notice.clone() else {
            return;
        };

        let mut dismissed = false;
        egui::Window::new(notice.title.as_str())
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(notice.message.as_str());
                if ui.button("OK").clicked() {
                    dismissed = true;
                }
            });

        if dismissed {
            self.lock().notice = None;
        }
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let (status, blocked) = {
            let shared = self.lock();
            (shared.status.clone(), shared.notice.is_some())
        };

        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.label(status);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.add_enabled_ui(!blocked, |ui| {
                ui.horizontal(|ui| {
                    ui.selectable_value(&mut self.tab, Tab::Search, "Search Case");
                    ui.selectable_value(&mut self.tab, Tab::CauseList, "Cause List");
                });
                ui.separator();

                match self.tab {
                    Tab::Search => self.search_tab(ui),
                    Tab::CauseList => self.cause_list_tab(ui),
                }
            });
        });

        self.notice_window(ctx);
    }
}

fn lock_shared(shared: &Mutex<Shared>) -> MutexGuard<'_, Shared> {
    shared
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}
