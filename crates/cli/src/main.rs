use anyhow::Context;
use baque_core::{KnowledgeRecord, Resolver};
use baque_data::{
    default_knowledge, default_knowledge_path, export_file_name, normalize_locale, KnowledgeError,
    KnowledgeStore,
};
use std::io::{self, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UiLocale {
    EnUs,
    ZhCn,
}

impl UiLocale {
    fn code(self) -> &'static str {
        match self {
            Self::EnUs => "en_US",
            Self::ZhCn => "zh_CN",
        }
    }

    fn from_opt(value: Option<&str>) -> Self {
        let normalized = normalize_locale(value);
        if normalized == "zh_CN" {
            Self::ZhCn
        } else {
            Self::EnUs
        }
    }

    fn text<'a>(self, en: &'a str, zh: &'a str) -> &'a str {
        if matches!(self, Self::ZhCn) {
            zh
        } else {
            en
        }
    }
}

#[derive(Debug, Clone)]
struct CliOptions {
    locale: UiLocale,
    kb_path: Option<PathBuf>,
    query: Option<String>,
    defaults: bool,
}

fn parse_cli_options(args: &[String]) -> CliOptions {
    let mut locale_arg: Option<String> = std::env::var("BAQUE_LANG").ok();
    let mut kb_path = None;
    let mut query = None;
    let mut defaults = false;
    let mut idx = 0usize;
    while idx < args.len() {
        match args[idx].as_str() {
            "--defaults" => defaults = true,
            "--lang" | "-l" => {
                if let Some(value) = args.get(idx + 1) {
                    locale_arg = Some(value.clone());
                    idx += 1;
                }
            }
            "--kb" => {
                if let Some(value) = args.get(idx + 1) {
                    kb_path = Some(PathBuf::from(value));
                    idx += 1;
                }
            }
            "--query" | "-q" => {
                if let Some(value) = args.get(idx + 1) {
                    query = Some(value.clone());
                    idx += 1;
                }
            }
            _ => {}
        }
        idx += 1;
    }
    CliOptions {
        locale: UiLocale::from_opt(locale_arg.as_deref()),
        kb_path,
        query,
        defaults,
    }
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()),
        ))
        .with_writer(io::stderr)
        .init();
}

fn main() {
    init_logging();
    let args: Vec<String> = std::env::args().skip(1).collect();
    let options = parse_cli_options(&args);
    if let Err(err) = run(options) {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn run(options: CliOptions) -> anyhow::Result<()> {
    let path = options
        .kb_path
        .or_else(default_knowledge_path)
        .context("knowledge base path unavailable (set BAQUE_KB or pass --kb)")?;
    let mut store = if options.defaults {
        KnowledgeStore::with_base(path, default_knowledge())
    } else {
        KnowledgeStore::open(path)
    };
    let resolver = Resolver::default();
    if let Some(query) = options.query {
        println!("{}", answer_query(&resolver, &query, store.records()));
        return Ok(());
    }
    run_prompt(options.locale, &mut store, &resolver)
}

fn answer_query(resolver: &Resolver, query: &str, records: &[KnowledgeRecord]) -> String {
    let resolution = resolver.resolve_with_stage(query, records);
    tracing::debug!(query, stage = resolution.stage.id(), "resolved query");
    resolution.answer
}

fn read_line(prompt: &str) -> Option<String> {
    print!("{prompt}");
    let _ = io::stdout().flush();
    let mut line = String::new();
    if io::stdin().read_line(&mut line).ok()? == 0 {
        return None;
    }
    Some(line.trim_end_matches(&['\n', '\r'][..]).to_string())
}

fn run_prompt(
    locale: UiLocale,
    store: &mut KnowledgeStore,
    resolver: &Resolver,
) -> anyhow::Result<()> {
    println!("{}: {}", locale.text("locale", "语言"), locale.code());
    println!(
        "{}: {} ({} {})",
        locale.text("knowledge base", "知识库"),
        store.path().display(),
        store.records().len(),
        locale.text("entries", "条")
    );
    print_help(locale);
    while let Some(line) = read_line("> ") {
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        let (cmd, rest) = input
            .split_once(char::is_whitespace)
            .map_or((input, ""), |(cmd, rest)| (cmd, rest.trim()));
        match cmd {
            "help" | "h" | "?" => print_help(locale),
            "quit" | "exit" => break,
            "ask" => {
                if !rest.is_empty() {
                    println!("{}", answer_query(resolver, rest, store.records()));
                }
            }
            "add" | "save" => add_entry(locale, store, rest),
            "check" => check_entry(locale, store, rest),
            "del" | "delete" => delete_entry(locale, store, rest),
            "list" | "ls" => list_entries(locale, store, rest),
            "import" => import_entries(locale, store, rest),
            "export" => export_entries(locale, store, rest)?,
            _ => println!("{}", answer_query(resolver, input, store.records())),
        }
    }
    Ok(())
}

fn print_help(locale: UiLocale) {
    println!("{}", locale.text("Commands:", "命令："));
    println!(
        "  <text> | ask <text>          {}",
        locale.text(
            "look up a question, e.g. 666, 一张6和两张A, 16b, K32b220",
            "查询问题，例如 666、一张6和两张A、16b、K32b220"
        )
    );
    println!(
        "  add <question> => <answer>   {}",
        locale.text("save or replace an entry", "保存或覆盖条目")
    );
    println!(
        "  check <question>             {}",
        locale.text("show the stored answer for a question", "查看问题的已存答案")
    );
    println!(
        "  del <question>               {}",
        locale.text("delete entries with this question", "删除该问题的条目")
    );
    println!(
        "  list [filter]                {}",
        locale.text("list entries", "列出条目")
    );
    println!(
        "  import <path>                {}",
        locale.text("replace the knowledge base from a JSON file", "从 JSON 文件导入并替换知识库")
    );
    println!(
        "  export [path]                {}",
        locale.text("write the knowledge base to a JSON file", "导出知识库到 JSON 文件")
    );
    println!("  help|h|?                     {}", locale.text("show help", "显示帮助"));
    println!("  quit|exit                    {}", locale.text("exit", "退出"));
}

fn add_entry(locale: UiLocale, store: &mut KnowledgeStore, rest: &str) {
    let Some((question, answer)) = rest.split_once("=>") else {
        println!(
            "{}: add <question> => <answer>",
            locale.text("usage", "用法")
        );
        return;
    };
    let (question, answer) = (question.trim(), answer.trim());
    if question.is_empty() {
        println!("{}", locale.text("question is required", "请输入问题"));
        return;
    }
    if answer.is_empty() {
        println!("{}", locale.text("answer is required", "请输入答案"));
        return;
    }
    match store.upsert(question, answer) {
        Ok(()) => println!("{}", locale.text("saved", "保存成功")),
        Err(err) => print_store_error(locale, &err),
    }
}

fn check_entry(locale: UiLocale, store: &KnowledgeStore, rest: &str) {
    match store.base().find_exact(rest) {
        Some(record) => println!("{}", record.answer),
        None => println!(
            "{}",
            locale.text("question not found in the knowledge base", "库中未找到此问题")
        ),
    }
}

fn delete_entry(locale: UiLocale, store: &mut KnowledgeStore, rest: &str) {
    let matches = store.records().iter().filter(|r| r.question == rest).count();
    if matches == 0 {
        println!(
            "{}",
            locale.text("question not found in the knowledge base", "库中未找到此问题")
        );
        return;
    }
    let prompt = format!(
        "{} ({matches}) [y/N] ",
        locale.text("delete these entries?", "确定删除吗？")
    );
    let confirmed = read_line(&prompt)
        .map(|reply| matches!(reply.trim(), "y" | "Y" | "yes" | "是"))
        .unwrap_or(false);
    if !confirmed {
        return;
    }
    match store.delete_by_question(rest) {
        Ok(removed) => println!("{}: {removed}", locale.text("deleted", "已删除")),
        Err(err) => print_store_error(locale, &err),
    }
}

fn list_entries(locale: UiLocale, store: &KnowledgeStore, filter: &str) {
    let needle = filter.to_lowercase();
    let mut shown = 0usize;
    for record in store.records() {
        if !needle.is_empty()
            && !record.question.to_lowercase().contains(&needle)
            && !record.answer.to_lowercase().contains(&needle)
        {
            continue;
        }
        shown += 1;
        println!(
            "{:<12} {}  [{}]",
            record.question,
            record.answer.replace('\n', " / "),
            record.timestamp
        );
    }
    println!("{}: {shown}", locale.text("entries", "条目数"));
}

fn import_entries(locale: UiLocale, store: &mut KnowledgeStore, rest: &str) {
    if rest.is_empty() {
        println!("{}: import <path>", locale.text("usage", "用法"));
        return;
    }
    match store.import(&PathBuf::from(rest)) {
        Ok(count) => {
            if matches!(locale, UiLocale::ZhCn) {
                println!("成功导入 {count} 条数据");
            } else {
                println!("imported {count} entries");
            }
        }
        Err(err) => print_store_error(locale, &err),
    }
}

fn export_entries(locale: UiLocale, store: &KnowledgeStore, rest: &str) -> anyhow::Result<()> {
    let path = if rest.is_empty() {
        let date = chrono::Local::now().format("%Y-%m-%d").to_string();
        std::env::current_dir()
            .context("resolve export directory")?
            .join(export_file_name(&date))
    } else {
        PathBuf::from(rest)
    };
    match store.export(&path) {
        Ok(()) => println!("{}: {}", locale.text("exported", "已导出"), path.display()),
        Err(err) => print_store_error(locale, &err),
    }
    Ok(())
}

fn print_store_error(locale: UiLocale, err: &KnowledgeError) {
    println!("{}: {err}", store_error_summary(locale, err));
}

fn store_error_summary(locale: UiLocale, err: &KnowledgeError) -> &'static str {
    if err.is_format_error() {
        return locale.text(
            "wrong file format, a JSON array is required",
            "文件格式不正确，需要是JSON数组",
        );
    }
    match err {
        KnowledgeError::Parse(_) => locale.text("file could not be parsed", "文件解析错误"),
        _ => locale.text("error", "错误"),
    }
}
