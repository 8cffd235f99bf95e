//! 运行级截止时间
//!
//! 每次运行只计算一次，所有跳的所有阶段共享同一个值，绝不延长

use chrono::{DateTime, Duration, Utc};

use crate::error::{AppError, AppResult};

/// 每次运行的固定时间窗口：3 分钟
const RUN_WINDOW_SECS: i64 = 3 * 60;

/// 绝对截止时间
///
/// 在每个阶段转换前检查；一旦过期，后续所有检查都失败
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline {
    at: DateTime<Utc>,
}

impl Deadline {
    /// 由请求接收时间计算截止时间（receivedAt + 3 分钟）
    pub fn for_run(received_at: DateTime<Utc>) -> Self {
        Self {
            at: received_at + Duration::seconds(RUN_WINDOW_SECS),
        }
    }

    /// 直接指定截止时刻（测试用）
    pub fn at(instant: DateTime<Utc>) -> Self {
        Self { at: instant }
    }

    /// 截止时间是否已过
    pub fn expired(&self) -> bool {
        Utc::now() > self.at
    }

    /// 剩余秒数（不小于 0）
    pub fn remaining_secs(&self) -> i64 {
        (self.at - Utc::now()).num_seconds().max(0)
    }

    /// 阶段转换前的检查：已过期则返回标注了该阶段的错误
    pub fn check(&self, phase: &str) -> AppResult<()> {
        if self.expired() {
            Err(AppError::deadline(phase))
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_deadline_passes_checks() {
        let deadline = Deadline::for_run(Utc::now());
        assert!(!deadline.expired());
        assert!(deadline.check("navigate").is_ok());
        assert!(deadline.remaining_secs() > 170);
    }

    #[test]
    fn test_expired_deadline_fails_every_phase() {
        // 截止时间一旦过去，后续每个阶段检查都必须失败
        let deadline = Deadline::for_run(Utc::now() - Duration::minutes(10));
        for phase in ["navigate", "extract", "select", "solve", "submit", "evaluate"] {
            let err = deadline.check(phase).unwrap_err();
            match err {
                AppError::DeadlineExceeded { phase: named } => assert_eq!(named, phase),
                other => panic!("意外的错误类型: {:?}", other),
            }
        }
    }

    #[test]
    fn test_remaining_secs_clamped_to_zero() {
        let deadline = Deadline::for_run(Utc::now() - Duration::minutes(10));
        assert_eq!(deadline.remaining_secs(), 0);
    }
}
