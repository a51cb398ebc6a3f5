//! 检测结果数据结构
//!
//! 定义单次探测的结果记录和三种输出格式的渲染

use crate::check::matcher::MatchVerdict;
use crate::config::{CheckConfig, MatchMode};
use serde::{Deserialize, Serialize};

/// 单次检测的结果记录
///
/// 每次探测请求新建一份，渲染为响应后即丢弃，从不缓存。
/// 命令和匹配参数从当次使用的配置快照回显，便于调用方核对
/// 结果对应的配置。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckResult {
    /// 是否匹配成功（`verdict` 的布尔投影）
    pub success: bool,
    /// 匹配判定，区分不匹配与匹配参数无效
    pub verdict: MatchVerdict,
    /// 命令的原始标准输出，保留尾部换行
    pub output: String,
    /// 执行的命令行
    pub command: String,
    /// 使用的匹配模式
    pub match_type: MatchMode,
    /// 使用的期望值
    pub match_value: String,
}

/// XML渲染视图，元素名采用首字母大写形式
#[derive(Serialize)]
#[serde(rename = "Result", rename_all = "PascalCase")]
struct XmlResult<'a> {
    success: bool,
    verdict: MatchVerdict,
    output: &'a str,
    command: &'a str,
    match_type: MatchMode,
    match_value: &'a str,
}

impl CheckResult {
    /// 根据配置快照和判定组装检测结果
    ///
    /// # 参数
    /// * `config` - 当次使用的配置快照
    /// * `output` - 命令的原始标准输出
    /// * `verdict` - 匹配判定
    pub fn new(config: &CheckConfig, output: String, verdict: MatchVerdict) -> Self {
        Self {
            success: verdict.is_success(),
            verdict,
            output,
            command: config.command.clone(),
            match_type: config.match_type,
            match_value: config.match_value.clone(),
        }
    }

    /// 渲染为JSON文档
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// 渲染为XML文档
    pub fn to_xml(&self) -> Result<String, quick_xml::SeError> {
        quick_xml::se::to_string(&XmlResult {
            success: self.success,
            verdict: self.verdict,
            output: &self.output,
            command: &self.command,
            match_type: self.match_type,
            match_value: &self.match_value,
        })
    }

    /// 渲染为状态行，供自动化拨测使用
    ///
    /// 丢弃除成功与否之外的全部字段。
    pub fn to_status_line(&self) -> &'static str {
        if self.success {
            "success\n"
        } else {
            "failed\n"
        }
    }
}
