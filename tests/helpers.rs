/// A fully rendered problem page, trimmed to the parts the extractor reads.
pub const LRU_CACHE_HTML: &str = r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"><title>LRU Cache - LeetCode</title></head>
<body>
  <div id="qd-content">
    <div class="text-title-large"><a href="/problems/lru-cache/">146. LRU Cache</a></div>
    <div class="text-difficulty-medium">Medium</div>
    <div data-track-load="description_content"><p>Design a data structure.</p></div>
  </div>
</body>
</html>"#;

pub const TWO_SUM_HTML: &str = r#"<!DOCTYPE html>
<html><body>
  <div class="question-content">
    <h4 data-cy="question-title">1. Two Sum</h4>
    <div diff="easy" class="css-10o4wqw">Easy</div>
  </div>
</body></html>"#;

/// The app shell before the problem view has rendered.
pub const SHELL_HTML: &str = r#"<!DOCTYPE html>
<html><body><div id="__next"><div class="loading"></div></div></body></html>"#;

pub const LRU_URL: &str = "https://leetcode.com/problems/lru-cache/";
pub const TWO_SUM_URL: &str = "https://leetcode.com/problems/two-sum/";
