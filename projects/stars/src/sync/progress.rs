use tracing::info;

/// Receives coarse progress while stargazers are paged in.
///
/// `completed` counts edges seen so far for the current repository; `total`
/// is the repository's stargazer count when the API reports it.
pub trait ProgressSink {
	fn on_progress(&mut self, completed: u64, total: Option<u64>);

	fn on_repository_start(&mut self, _owner: &str, _name: &str) {}

	fn on_repository_done(&mut self, _owner: &str, _name: &str, _new_stars: usize) {}
}

impl<F> ProgressSink for F
where
	F: FnMut(u64, Option<u64>),
{
	fn on_progress(&mut self, completed: u64, total: Option<u64>) {
		self(completed, total)
	}
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
	fn on_progress(&mut self, _completed: u64, _total: Option<u64>) {}
}

/// Progress as log lines.
#[derive(Debug, Default, Clone)]
pub struct TracingProgress {
	current: String,
}

impl ProgressSink for TracingProgress {
	fn on_progress(&mut self, completed: u64, total: Option<u64>) {
		match total {
			Some(total) => info!("Fetching stargazers for {}: {completed}/{total} seen", self.current),
			None => info!("Fetching stargazers for {}: {completed} seen", self.current),
		}
	}

	fn on_repository_start(&mut self, owner: &str, name: &str) {
		self.current = format!("{owner}/{name}");
	}

	fn on_repository_done(&mut self, owner: &str, name: &str, new_stars: usize) {
		info!("Done with {owner}/{name}: {new_stars} new stars");
	}
}
