//! 配置加载示例
//!
//! 演示如何从文件加载配置并使用环境变量覆盖

use mavbridge_config::BridgeConfig;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== MAVBridge 配置加载示例 ===\n");

    // 示例 1: 使用默认配置
    let config = BridgeConfig::default();
    println!("1. 默认配置:\n{}\n", config.summary());

    // 示例 2: 从文件加载配置并应用环境变量覆盖
    let path = std::env::args().nth(1).unwrap_or_else(|| "mavbridge.toml".to_string());
    match BridgeConfig::from_file_with_env(&path) {
        Ok(config) => println!("2. 从 {} 加载:\n{}\n", path, config.summary()),
        Err(e) => println!("2. 加载 {} 失败: {}\n", path, e),
    }

    // 示例 3: 无效配置
    let mut invalid = BridgeConfig::default();
    invalid.ekf_status.queue_size = 0;
    match invalid.validate() {
        Ok(_) => println!("3. 配置有效"),
        Err(e) => println!("3. 配置无效: {}", e),
    }

    Ok(())
}
