use crate::{CaptureConfig, Error, ExportReport, Exporter, Region, Result, Snapshot};
use std::path::PathBuf;
use std::sync::mpsc::{self, Sender};
use std::thread;
use tokio::sync::oneshot;

enum Command {
    Capture(Region, oneshot::Sender<Result<Snapshot>>),
    Export(Region, PathBuf, oneshot::Sender<Result<ExportReport>>),
    Close(oneshot::Sender<Result<()>>),
}

/// An async-friendly export service backed by a dedicated worker thread.
///
/// The worker thread owns a synchronous [`Exporter`] and executes commands
/// sent from async tasks, so callers can use an async interface without the
/// capture pipeline (which parses documents on the calling thread) needing
/// to be `Send` across await points.
#[derive(Clone)]
pub struct ExportService {
    cmd_tx: Sender<Command>,
}

impl ExportService {
    /// Create a new service (spawns a background thread that owns the
    /// exporter).
    pub async fn new(config: Option<CaptureConfig>) -> Result<Self> {
        let config = config.unwrap_or_default();

        let (cmd_tx, cmd_rx) = mpsc::channel::<Command>();
        let (init_tx, init_rx): (oneshot::Sender<Result<()>>, oneshot::Receiver<Result<()>>) =
            oneshot::channel();

        thread::spawn(move || {
            let exporter = Exporter::new(config);
            let _ = init_tx.send(Ok(()));

            while let Ok(cmd) = cmd_rx.recv() {
                match cmd {
                    Command::Capture(region, resp) => {
                        let res = exporter.capture(&region);
                        let _ = resp.send(res);
                    }
                    Command::Export(region, dir, resp) => {
                        let res = exporter.export_to_dir(&region, &dir);
                        let _ = resp.send(res);
                    }
                    Command::Close(resp) => {
                        let _ = resp.send(Ok(()));
                        break;
                    }
                }
            }
        });

        let init_res = init_rx
            .await
            .map_err(|e| Error::Other(format!("Worker init canceled: {}", e)))?;
        init_res?;

        Ok(Self { cmd_tx })
    }

    /// Capture the region into a raster snapshot on the worker thread.
    pub async fn capture(&self, region: Region) -> Result<Snapshot> {
        let (tx, rx) = oneshot::channel();
        let _ = self.cmd_tx.send(Command::Capture(region, tx));
        rx.await
            .map_err(|e| Error::Other(format!("Capture canceled: {}", e)))?
    }

    /// Export the region and deliver the document into `dir`.
    pub async fn export_to_dir(&self, region: Region, dir: PathBuf) -> Result<ExportReport> {
        let (tx, rx) = oneshot::channel();
        let _ = self.cmd_tx.send(Command::Export(region, dir, tx));
        rx.await
            .map_err(|e| Error::Other(format!("Export canceled: {}", e)))?
    }

    /// Shutdown the background worker.
    pub async fn close(self) -> Result<()> {
        let (tx, rx) = oneshot::channel();
        let _ = self.cmd_tx.send(Command::Close(tx));
        rx.await
            .map_err(|e| Error::Other(format!("Close canceled: {}", e)))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{resume_region, Profile};

    #[tokio::test]
    async fn capture_runs_on_the_worker() {
        let service = ExportService::new(None).await.unwrap();
        let snapshot = service
            .capture(resume_region(&Profile::builtin()))
            .await
            .unwrap();
        assert!(snapshot.png_data.starts_with(&[0x89, b'P', b'N', b'G']));
        service.close().await.unwrap();
    }

    #[tokio::test]
    async fn errors_cross_the_channel_intact() {
        let service = ExportService::new(None).await.unwrap();
        let region = Region::new("<html><body></body></html>", "#resume");
        let err = service.capture(region).await.unwrap_err();
        assert!(matches!(err, Error::RegionNotFound(_)));
        service.close().await.unwrap();
    }
}
