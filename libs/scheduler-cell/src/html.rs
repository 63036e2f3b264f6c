use std::fmt::Write;

use shared_utils::html::{datetime_local_value, escape_html, page};

use crate::screen::SchedulerScreen;

pub fn render_page(screen: &SchedulerScreen) -> String {
    let mut out = String::new();

    out.push_str("<h1 class=\"text-2xl font-bold mb-4\">Appointment Scheduler</h1>\n");

    out.push_str("<form method=\"post\" action=\"/scheduler/create\" class=\"mb-4\">\n");
    let _ = writeln!(
        out,
        "<label for=\"appointmentTitle\">Appointment Title</label><input id=\"appointmentTitle\" name=\"title\" type=\"text\" value=\"{}\" placeholder=\"Enter appointment title\">",
        escape_html(&screen.draft.title)
    );
    out.push_str("<button type=\"submit\">Create Appointment</button>\n</form>\n");

    if let Some(alert) = screen.alert {
        let _ = writeln!(
            out,
            "<div role=\"alert\" class=\"mt-4 destructive\"><h5>Error</h5><p>{}</p></div>",
            escape_html(alert)
        );
    }

    let start = screen.draft.start.as_ref().map(datetime_local_value).unwrap_or_default();
    let end = screen.draft.end.as_ref().map(datetime_local_value).unwrap_or_default();
    out.push_str("<form method=\"post\" action=\"/scheduler/range\" class=\"mt-4\">\n");
    let _ = writeln!(
        out,
        "<label for=\"rangeStart\">Start</label><input id=\"rangeStart\" name=\"start\" type=\"datetime-local\" value=\"{}\">",
        start
    );
    let _ = writeln!(
        out,
        "<label for=\"rangeEnd\">End</label><input id=\"rangeEnd\" name=\"end\" type=\"datetime-local\" value=\"{}\">",
        end
    );
    out.push_str("<button type=\"submit\">Select Time Slot</button>\n</form>\n");

    out.push_str("<section class=\"mt-4\">\n");
    if screen.days.is_empty() {
        out.push_str("<p>No appointments scheduled.</p>\n");
    }
    for day in &screen.days {
        let _ = writeln!(out, "<h2>{}</h2>\n<ul>", day.date.format("%A, %B %d %Y"));
        for event in &day.events {
            let _ = writeln!(
                out,
                "<li><strong>{}</strong> {}</li>",
                escape_html(&event.title),
                escape_html(&event.label)
            );
        }
        out.push_str("</ul>\n");
    }
    out.push_str("</section>\n");

    page("Appointment Scheduler", &out)
}
