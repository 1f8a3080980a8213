#[derive(Debug, Clone)]
pub enum Progress {
    TaskStart { total_steps: u64 },
    ReplicateStart { index: usize, temperature: f64 },
    TaskIncrement,
    TaskFinish,

    Message(String),
}

pub type ProgressCallback<'a> = Box<dyn Fn(Progress) + Send + Sync + 'a>;

#[derive(Default)]
pub struct ProgressReporter<'a> {
    callback: Option<ProgressCallback<'a>>,
}

impl<'a> ProgressReporter<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_callback(callback: ProgressCallback<'a>) -> Self {
        Self {
            callback: Some(callback),
        }
    }

    #[inline]
    pub fn report(&self, event: Progress) {
        if let Some(cb) = &self.callback {
            cb(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn reporter_without_callback_ignores_events() {
        let reporter = ProgressReporter::new();
        reporter.report(Progress::TaskIncrement);
    }

    #[test]
    fn reporter_forwards_events_to_callback() {
        let seen = Mutex::new(Vec::new());
        let reporter = ProgressReporter::with_callback(Box::new(|event| {
            seen.lock().unwrap().push(format!("{:?}", event));
        }));

        reporter.report(Progress::TaskStart { total_steps: 3 });
        reporter.report(Progress::Message("hello".to_string()));
        drop(reporter);

        let seen = seen.into_inner().unwrap();
        assert_eq!(seen.len(), 2);
        assert!(seen[0].contains("total_steps: 3"));
        assert!(seen[1].contains("hello"));
    }
}
