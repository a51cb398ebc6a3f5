//! 输出匹配判定模块
//!
//! 将命令输出与配置的期望值比较，产生三态判定

use crate::config::MatchMode;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// 匹配判定结果
///
/// `Invalid` 表示配置的匹配参数本身无法使用（正则表达式语法
/// 错误、期望值不是整数），此时成功判定与 `NoMatch` 一样为否，
/// 但调用方能区分"输出不匹配"和"匹配参数写错了"。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchVerdict {
    /// 输出匹配期望值
    Match,
    /// 输出不匹配期望值
    NoMatch,
    /// 匹配参数无效
    Invalid,
}

impl MatchVerdict {
    /// 判定是否成功
    pub fn is_success(&self) -> bool {
        matches!(self, MatchVerdict::Match)
    }
}

impl std::fmt::Display for MatchVerdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchVerdict::Match => write!(f, "匹配"),
            MatchVerdict::NoMatch => write!(f, "不匹配"),
            MatchVerdict::Invalid => write!(f, "参数无效"),
        }
    }
}

/// 判定命令输出是否匹配期望值
///
/// 纯函数：相同输入总是产生相同判定，无副作用，可并发调用。
///
/// 各模式语义：
/// - `Exact`: 去除输出首尾空白后与期望值逐字节比较，期望值不修剪
/// - `Regex`: 把期望值编译为正则表达式，在未修剪的输出中搜索；
///   编译失败判定为 `Invalid`
/// - `Integer`: 期望值和修剪后的输出都按十进制有符号整数解析后
///   比较数值；期望值解析失败为 `Invalid`，输出解析失败为 `NoMatch`
///
/// # 参数
/// * `output` - 命令的原始标准输出
/// * `match_type` - 匹配模式
/// * `match_value` - 配置的期望值
///
/// # 返回
/// * `MatchVerdict` - 匹配判定
pub fn evaluate(output: &str, match_type: MatchMode, match_value: &str) -> MatchVerdict {
    match match_type {
        MatchMode::Exact => {
            if output.trim() == match_value {
                MatchVerdict::Match
            } else {
                MatchVerdict::NoMatch
            }
        }
        MatchMode::Regex => match Regex::new(match_value) {
            Ok(pattern) => {
                if pattern.is_match(output) {
                    MatchVerdict::Match
                } else {
                    MatchVerdict::NoMatch
                }
            }
            Err(e) => {
                tracing::debug!("正则表达式编译失败: {e}");
                MatchVerdict::Invalid
            }
        },
        MatchMode::Integer => {
            let expected: i64 = match match_value.parse() {
                Ok(value) => value,
                Err(_) => return MatchVerdict::Invalid,
            };
            match output.trim().parse::<i64>() {
                Ok(actual) if actual == expected => MatchVerdict::Match,
                _ => MatchVerdict::NoMatch,
            }
        }
    }
}
