//! librcs 是使用 Rust 实现的动态优化算法评测工具，计算相对收敛速度（Relative Convergence Speed，RCS）。
//!
//! 动态优化问题的适应度函数会在若干个变化周期之间发生变化。给定每个变化周期的全局最优适应度，以及每个算法在每一代找到的最优适应度，RCS 度量每个算法在各个变化周期内逼近全局最优的速度：0 表示一开始就找到了全局最优，1 表示始终和所有算法中最差的表现一样差。
//!
//! 该度量是相对的：归一化所用的最差适应度来自参与比较的这一组算法，所以不同算法组合之间的分数不能直接比较。目前只支持最小化问题。
//!
//! rcs 是使用 librcs 实现的命令行程序，用户提供实验配置文件和各次运行的数据表，本程序能够检查数据并计算各个算法的分数。

pub mod config;
pub mod data;
pub mod error;
pub mod experiment;
pub mod interfaces;
pub mod measures;

pub use error::Error;

/// 适应度，越小越好
pub type Fitness = f64;

/// 代数，即每次运行的适应度序列中的下标
pub type Generation = usize;

/// 变化周期的序号
pub type ChangePeriod = usize;
