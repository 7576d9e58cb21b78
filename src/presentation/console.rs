//! 交互控制台
//!
//! 提供与原网页相同的操作：添加文件、查看结果、复制单条结果、清空全部。

use crate::models::select_paths;
use crate::orchestrator::App;
use anyhow::Result;
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};

const HELP_TEXT: &str = "\
可用命令:
  add <文件...>    添加 PDF 并开始提取
  list             显示全部结果
  copy <序号>      输出一条结果的 TSV 行（可粘贴进表格）
  export [路径]    导出全部成功结果为 TSV
  clear            清空全部结果（需要确认）
  help             显示帮助
  quit             退出";

/// 控制台命令
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Add(Vec<String>),
    List,
    Copy(usize),
    Export(Option<String>),
    Clear,
    Help,
    Quit,
}

/// 解析一行输入；空行返回 `Ok(None)`
pub fn parse_command(line: &str) -> Result<Option<Command>, String> {
    let mut words = line.split_whitespace();
    let Some(name) = words.next() else {
        return Ok(None);
    };
    let args: Vec<String> = words.map(str::to_string).collect();

    let command = match name.to_ascii_lowercase().as_str() {
        "add" => {
            if args.is_empty() {
                return Err("用法: add <文件...>".to_string());
            }
            Command::Add(args)
        }
        "list" | "ls" => Command::List,
        "copy" => {
            let position = args
                .first()
                .and_then(|arg| arg.parse::<usize>().ok())
                .filter(|n| *n > 0)
                .ok_or_else(|| "用法: copy <序号>（从 1 开始）".to_string())?;
            Command::Copy(position)
        }
        "export" => Command::Export(args.into_iter().next()),
        "clear" => Command::Clear,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => return Err(format!("未知命令: {}（输入 help 查看帮助）", other)),
    };

    Ok(Some(command))
}

/// 确认回答是否为肯定
pub fn is_confirmation(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

fn prompt(text: &str) -> Result<()> {
    print!("{}", text);
    std::io::stdout().flush()?;
    Ok(())
}

/// 运行控制台，直到 `quit` 或输入结束
pub async fn run(app: &App) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    println!("{}", HELP_TEXT);

    loop {
        prompt("> ")?;
        let Some(line) = lines.next_line().await? else {
            break;
        };

        let command = match parse_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(message) => {
                println!("{}", message);
                continue;
            }
        };

        match command {
            Command::Add(paths) => match app.submit_selection(select_paths(paths)) {
                Some(handle) => {
                    println!("{}", app.report());
                    // 提取在后台进行，控制台可以继续 list / clear
                    tokio::spawn(handle.wait());
                }
                None => println!("没有可处理的 PDF 文件"),
            },
            Command::List => {
                println!("{}", app.report());
                println!("{}", app.status_line());
            }
            Command::Copy(position) => match app.copy_line(position) {
                Some(line) => println!("{}", line),
                None => println!("第 {} 条结果不存在或尚未提取成功", position),
            },
            Command::Export(path) => match app.export(path.as_deref()).await {
                Ok(rows) => println!("已导出 {} 条结果", rows),
                Err(e) => println!("导出失败: {:#}", e),
            },
            Command::Clear => {
                prompt("Clear all results? [y/N] ")?;
                let answer = lines.next_line().await?.unwrap_or_default();
                if app.clear_results(is_confirmation(&answer)) {
                    println!("已清空全部结果");
                } else {
                    println!("已取消");
                }
            }
            Command::Help => println!("{}", HELP_TEXT),
            Command::Quit => {
                if app.is_processing() {
                    println!("仍有文件在处理中，退出后这些结果将被丢弃");
                }
                break;
            }
        }
    }

    Ok(())
}
