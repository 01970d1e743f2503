use std::time::{Duration, Instant};

#[cfg(feature = "cli")]
use sysinfo::{Pid, System};

#[derive(Debug, Clone)]
pub struct PhaseStats {
    pub phase: String,
    pub elapsed: Duration,
    pub memory_mb: Option<u64>,
    pub cpu_usage: Option<f32>,
}

/// 記錄每個評分階段的耗時；啟用 `cli` feature 時額外透過 sysinfo 取得記憶體與 CPU
pub struct SystemMonitor {
    enabled: bool,
    start_time: Instant,
    last_phase: Instant,
    peak_memory_mb: u64,
    phases: Vec<PhaseStats>,
    #[cfg(feature = "cli")]
    probe: Option<(System, Pid)>,
}

impl SystemMonitor {
    pub fn new(enabled: bool) -> Self {
        #[cfg(feature = "cli")]
        let probe = if enabled {
            match sysinfo::get_current_pid() {
                Ok(pid) => {
                    let mut system = System::new();
                    system.refresh_all();
                    Some((system, pid))
                }
                Err(e) => {
                    tracing::warn!("System monitoring unavailable: {}", e);
                    None
                }
            }
        } else {
            None
        };

        let now = Instant::now();
        Self {
            enabled,
            start_time: now,
            last_phase: now,
            peak_memory_mb: 0,
            phases: Vec::new(),
            #[cfg(feature = "cli")]
            probe,
        }
    }

    #[cfg(feature = "cli")]
    fn sample(&mut self) -> (Option<u64>, Option<f32>) {
        let Some((system, pid)) = self.probe.as_mut() else {
            return (None, None);
        };
        system.refresh_all();
        match system.process(*pid) {
            Some(process) => (Some(process.memory() / 1024 / 1024), Some(process.cpu_usage())),
            None => (None, None),
        }
    }

    #[cfg(not(feature = "cli"))]
    fn sample(&mut self) -> (Option<u64>, Option<f32>) {
        (None, None)
    }

    /// 結束一個階段並輸出統計
    pub fn finish_phase(&mut self, phase: &str) {
        if !self.enabled {
            return;
        }

        let elapsed = self.last_phase.elapsed();
        self.last_phase = Instant::now();
        let (memory_mb, cpu_usage) = self.sample();

        if let Some(memory) = memory_mb {
            self.peak_memory_mb = self.peak_memory_mb.max(memory);
        }

        match (memory_mb, cpu_usage) {
            (Some(memory), Some(cpu)) => tracing::info!(
                "📊 {} - {:?}, CPU: {:.1}%, Memory: {}MB, Peak: {}MB",
                phase,
                elapsed,
                cpu,
                memory,
                self.peak_memory_mb
            ),
            _ => tracing::info!("📊 {} - {:?}", phase, elapsed),
        }

        self.phases.push(PhaseStats {
            phase: phase.to_string(),
            elapsed,
            memory_mb,
            cpu_usage,
        });
    }

    pub fn log_final_stats(&self) {
        if !self.enabled {
            return;
        }
        tracing::info!(
            "📊 Final Stats - Total Time: {:?}, Phases: {}, Peak Memory: {}MB",
            self.start_time.elapsed(),
            self.phases.len(),
            self.peak_memory_mb
        );
    }

    pub fn phases(&self) -> &[PhaseStats] {
        &self.phases
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

impl Default for SystemMonitor {
    fn default() -> Self {
        Self::new(false)
    }
}
