use std::fmt;

fn as_secs(dur: std::time::Duration) -> f64 {
    (dur.as_secs() as f64) * 1.0 + (dur.subsec_nanos() as f64) * 0.000000001
}

pub struct Timer(std::time::SystemTime);

impl Timer {
    pub fn new() -> Timer {
        Timer(std::time::SystemTime::now())
    }

    pub fn since(&self) -> f64 {
        as_secs(self.0.elapsed().unwrap_or_default())
    }

    pub fn reset(&mut self) {
        self.0 = std::time::SystemTime::now();
    }
}

pub struct LogTimes {
    pub timer: Timer,
    pub msgs: Vec<(String, f64)>,
    pub longest: usize,
}
impl LogTimes {
    pub fn new() -> LogTimes {
        LogTimes {
            timer: Timer::new(),
            msgs: Vec::new(),
            longest: 6,
        }
    }
    pub fn add(&mut self, msg: &str) {
        self.longest = usize::max(self.longest, msg.len());
        self.msgs.push((String::from(msg), self.timer.since()));
        self.timer.reset();
    }
}
impl fmt::Display for LogTimes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut tot = 0.0;
        let mut others = 0.0;
        for (a, b) in &self.msgs {
            if *b > 0.1 {
                write!(
                    f,
                    "{}:{}{:6.2}s\n",
                    a,
                    " ".repeat(self.longest - a.len()),
                    b
                )?;
            } else {
                others += b;
            }
            tot += b;
        }
        if others > 0.0 {
            write!(f, "OTHERS:{}{:6.2}s\n", " ".repeat(self.longest - 6), others)?;
        }
        write!(f, "TOTAL:{}{:6.2}s", " ".repeat(self.longest - 5), tot)
    }
}

pub struct ThreadTimer(cpu_time::ThreadTime);

impl ThreadTimer {
    pub fn new() -> ThreadTimer {
        ThreadTimer(cpu_time::ThreadTime::now())
    }

    pub fn since(&self) -> f64 {
        as_secs(self.0.elapsed())
    }
}

const TIMEFORMAT: &str = "%Y-%m-%dT%H:%M:%S";

pub fn timestamp_string(ts: i64) -> String {
    match chrono::DateTime::from_timestamp(ts, 0) {
        Some(dt) => dt.format(TIMEFORMAT).to_string(),
        None => format!("{}", ts),
    }
}

pub fn coordinate_as_float(v: i32) -> f64 {
    (v as f64) * 0.0000001
}

pub fn coordinate_as_integer(v: f64) -> i32 {
    if v < 0.0 {
        return ((v * 10000000.0) - 0.5) as i32;
    }

    ((v * 10000000.0) + 0.5) as i32
}
