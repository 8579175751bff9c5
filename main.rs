/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Demo shell: mounts the note-graph canvas in an eframe window against an
//! HTTP endpoint or a local snapshot file.

use std::path::PathBuf;
use std::sync::Arc;

use bpaf::Bpaf;

use notegraph::app::GraphCanvasApp;
use notegraph::fetch::{FileSnapshotSource, HttpSnapshotSource, SnapshotSource};
use notegraph::layout::PartialParams;

#[derive(Debug, Clone, Bpaf)]
#[bpaf(options, version)]
struct Args {
    /// Graph endpoint, e.g. http://localhost:3000/api/graph
    #[bpaf(long, argument("URL"))]
    url: Option<String>,

    /// Local snapshot JSON file (takes precedence over --url)
    #[bpaf(long, argument("PATH"))]
    file: Option<PathBuf>,

    /// Initial hop depth for the local view
    #[bpaf(long, argument("N"), fallback(1))]
    depth: u32,

    /// Start with node labels hidden
    #[bpaf(long)]
    no_labels: bool,
}

struct DemoShell {
    canvas: GraphCanvasApp,
}

impl eframe::App for DemoShell {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default().show(ctx, |ui| {
            self.canvas.show(ui);
        });
    }
}

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = args().run();

    let source: Arc<dyn SnapshotSource> = match (&args.file, &args.url) {
        (Some(path), _) => Arc::new(FileSnapshotSource::new(path)),
        (None, Some(url)) => match HttpSnapshotSource::new(url) {
            Ok(source) => Arc::new(source),
            Err(err) => {
                eprintln!("could not build HTTP client: {err}");
                std::process::exit(1);
            }
        },
        (None, None) => {
            eprintln!("one of --url or --file is required");
            std::process::exit(2);
        }
    };

    let mut canvas = GraphCanvasApp::new(source);
    canvas.set_on_node_click(|id| log::info!("note selected: {id}"));
    canvas.set_params(PartialParams {
        show_labels: Some(!args.no_labels),
        ..Default::default()
    });
    canvas.set_view_depth(args.depth.min(3));
    canvas.refresh();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1280.0, 860.0]),
        ..Default::default()
    };
    eframe::run_native(
        "notegraph",
        options,
        Box::new(move |_cc| Ok(Box::new(DemoShell { canvas }))),
    )
}
