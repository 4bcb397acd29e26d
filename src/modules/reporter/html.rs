use super::models::PurgeReport;
use crate::modules::common::utils;
use crate::modules::purger::models::{OperationResult, OutcomeStatus, Stage};

/// 生成 HTML 报告
pub fn generate_html_report(report: &PurgeReport) -> String {
    format!(r#"<!DOCTYPE html>
<html lang="zh-CN">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>清除报告 - {target}</title>
    <style>
        * {{ margin: 0; padding: 0; box-sizing: border-box; }}
        body {{
            font-family: "Segoe UI", "Microsoft YaHei", sans-serif;
            background: #eef1f5;
            min-height: 100vh;
            padding: 20px;
        }}
        .container {{
            max-width: 960px;
            margin: 0 auto;
            background: white;
            border-radius: 16px;
            box-shadow: 0 20px 60px rgba(0,0,0,0.15);
            overflow: hidden;
        }}
        .header {{
            background: linear-gradient(135deg, #2c3e50 0%, #34495e 100%);
            color: white;
            padding: 30px;
        }}
        .header h1 {{ font-size: 28px; margin-bottom: 10px; }}
        .header .meta {{ opacity: 0.8; font-size: 14px; }}
        .summary {{
            display: grid;
            grid-template-columns: repeat(auto-fit, minmax(160px, 1fr));
            gap: 20px;
            padding: 30px;
            background: #f8f9fa;
        }}
        .stat {{
            background: white;
            padding: 20px;
            border-radius: 12px;
            text-align: center;
            box-shadow: 0 2px 8px rgba(0,0,0,0.1);
        }}
        .stat .value {{ font-size: 32px; font-weight: bold; color: #667eea; }}
        .stat .label {{ color: #666; margin-top: 8px; font-size: 14px; }}
        .success .value {{ color: #27ae60; }}
        .failed .value {{ color: #e74c3c; }}
        .content {{ padding: 30px; }}
        .section-title {{
            font-size: 18px;
            color: #2c3e50;
            margin: 10px 0 20px;
            padding-bottom: 10px;
            border-bottom: 2px solid #667eea;
        }}
        table {{ width: 100%; border-collapse: collapse; margin-bottom: 20px; }}
        th, td {{ padding: 10px 12px; text-align: left; border-bottom: 1px solid #eee; }}
        th {{ background: #f8f9fa; color: #2c3e50; font-weight: 600; }}
        .status {{
            display: inline-block;
            padding: 4px 12px;
            border-radius: 20px;
            font-size: 12px;
            font-weight: 600;
            white-space: nowrap;
        }}
        .status.success {{ background: #d4edda; color: #155724; }}
        .status.skipped {{ background: #e9ecef; color: #495057; }}
        .status.failed {{ background: #f8d7da; color: #721c24; }}
        .path {{
            font-family: "Consolas", monospace;
            font-size: 13px;
            color: #666;
            word-break: break-all;
        }}
        .warnings {{
            background: #fff3cd;
            border-left: 4px solid #ffc107;
            padding: 15px 20px;
            margin-bottom: 20px;
        }}
        .warnings h3 {{ color: #856404; margin-bottom: 10px; }}
        .warnings ul {{ margin-left: 20px; color: #856404; }}
        .footer {{
            background: #f8f9fa;
            padding: 20px 30px;
            text-align: center;
            color: #666;
            font-size: 13px;
        }}
    </style>
</head>
<body>
    <div class="container">
        <div class="header">
            <h1>清除报告</h1>
            <div class="meta">
                <p>目标: <strong>{target}</strong></p>
                <p>生成时间: {generated_at}</p>
                <p>报告ID: {id}</p>
            </div>
        </div>

        <div class="summary">
            <div class="stat success">
                <div class="value">{succeeded}</div>
                <div class="label">成功</div>
            </div>
            <div class="stat">
                <div class="value">{not_found}</div>
                <div class="label">不存在</div>
            </div>
            <div class="stat failed">
                <div class="value">{failed}</div>
                <div class="label">失败</div>
            </div>
            <div class="stat">
                <div class="value">{freed}</div>
                <div class="label">释放空间</div>
            </div>
        </div>

        <div class="content">
            {warnings}
            {stages}
        </div>

        <div class="footer">
            <p>由 runtime-purge 生成</p>
        </div>
    </div>
</body>
</html>"#,
        target = escape_html(&report.target),
        generated_at = report.generated_at.format("%Y-%m-%d %H:%M:%S"),
        id = report.id,
        succeeded = report.succeeded_count(),
        not_found = report.not_found_count(),
        failed = report.failed_count(),
        freed = utils::format_size(report.total_bytes_freed()),
        warnings = generate_warnings(&report.warnings),
        stages = Stage::ALL
            .iter()
            .map(|stage| generate_stage_table(*stage, report.stage_operations(*stage).collect()))
            .collect::<String>(),
    )
}

fn generate_warnings(warnings: &[String]) -> String {
    if warnings.is_empty() {
        return String::new();
    }

    let items: String = warnings
        .iter()
        .map(|w| format!("<li>{}</li>", escape_html(w)))
        .collect();

    format!(r#"<div class="warnings"><h3>警告</h3><ul>{}</ul></div>"#, items)
}

fn generate_stage_table(stage: Stage, operations: Vec<&OperationResult>) -> String {
    let mut html = format!(
        r#"<h2 class="section-title">[{}/5] {}</h2>"#,
        stage.index(),
        stage.title()
    );

    if operations.is_empty() {
        html.push_str("<p>没有匹配项</p>");
        return html;
    }

    html.push_str(
        r#"
        <table>
            <thead>
                <tr>
                    <th>状态</th>
                    <th>对象</th>
                    <th>详情</th>
                    <th>释放空间</th>
                </tr>
            </thead>
            <tbody>"#,
    );

    for op in operations {
        let (status_html, detail) = match &op.status {
            OutcomeStatus::Succeeded => (r#"<span class="status success">成功</span>"#, op.detail.clone()),
            OutcomeStatus::NotFound => (r#"<span class="status skipped">不存在</span>"#, op.detail.clone()),
            OutcomeStatus::Failed(reason) => (r#"<span class="status failed">失败</span>"#, reason.clone()),
        };

        let size_html = if op.bytes_freed > 0 {
            utils::format_size(op.bytes_freed)
        } else {
            "-".to_string()
        };

        html.push_str(&format!(
            r#"
                <tr>
                    <td>{}</td>
                    <td class="path">{}</td>
                    <td class="path">{}</td>
                    <td>{}</td>
                </tr>"#,
            status_html,
            escape_html(&op.target),
            escape_html(&detail),
            size_html,
        ));
    }

    html.push_str("</tbody></table>");
    html
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
