//! 输出接口的抽象层
//!
//! 定义了一个特征，指定了在评测多次运行的过程中需要向用户反馈的数据。命令行界面和测试只需要各自实现发送方法，就可向用户报告各种数据，实现方式可以很不一样。

use crate::measures::Scores;
use serde::Serialize;

pub mod command_line;

/// 向用户反馈的消息类型
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum 消息 {
    RunLoaded {
        name: String,
        chgperiods: usize,
        generations: usize,
        algorithms: usize,
    },
    RunEvaluated {
        name: String,
        scores: Scores,
    },
    RunValid {
        name: String,
    },
    RunInvalid {
        name: String,
        error: String,
    },
}

pub trait 界面 {
    fn 发送(&self, message: 消息);
}
