//! 브라우저 원시 엔트리 모델.
//!
//! 관측 계층(호스트)이 관측 유형별로 밀어 넣는 타임스탬프 엔트리.
//! JSON 필드명은 브라우저 Performance API와 동일한 camelCase.
//! 시각은 모두 내비게이션 시작 기준 밀리초.

use serde::{Deserialize, Serialize};

/// FCP 페인트 엔트리 이름
pub const FIRST_CONTENTFUL_PAINT: &str = "first-contentful-paint";

/// 현재 창의 이벤트 루프에서 발생한 롱 태스크의 귀속 태그
pub const SELF_ATTRIBUTION: &str = "self";

/// 관측 유형
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ObservationType {
    Paint,
    FirstInput,
    LargestContentfulPaint,
    LayoutShift,
    #[serde(rename = "longtask")]
    LongTask,
}

impl ObservationType {
    /// 세션 시작 시 구독하는 유형 (롱 태스크는 FCP 이후 별도 구독)
    pub const SESSION: [ObservationType; 4] = [
        ObservationType::Paint,
        ObservationType::FirstInput,
        ObservationType::LargestContentfulPaint,
        ObservationType::LayoutShift,
    ];

    /// 브라우저 entryType 문자열
    pub fn as_str(&self) -> &'static str {
        match self {
            ObservationType::Paint => "paint",
            ObservationType::FirstInput => "first-input",
            ObservationType::LargestContentfulPaint => "largest-contentful-paint",
            ObservationType::LayoutShift => "layout-shift",
            ObservationType::LongTask => "longtask",
        }
    }
}

impl std::fmt::Display for ObservationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 관측 콜백 하나로 전달되는 엔트리
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "entryType", rename_all = "kebab-case")]
pub enum PerformanceEntry {
    Paint(PaintEntry),
    FirstInput(FirstInputEntry),
    LargestContentfulPaint(LargestContentfulPaintEntry),
    LayoutShift(LayoutShiftEntry),
    #[serde(rename = "longtask")]
    LongTask(LongTaskEntry),
}

impl PerformanceEntry {
    /// 엔트리 시작 시각
    pub fn start_time(&self) -> f64 {
        match self {
            PerformanceEntry::Paint(e) => e.start_time,
            PerformanceEntry::FirstInput(e) => e.start_time,
            PerformanceEntry::LargestContentfulPaint(e) => e.start_time,
            PerformanceEntry::LayoutShift(e) => e.start_time,
            PerformanceEntry::LongTask(e) => e.start_time,
        }
    }

    /// 이 엔트리가 속한 관측 유형
    pub fn observation_type(&self) -> ObservationType {
        match self {
            PerformanceEntry::Paint(_) => ObservationType::Paint,
            PerformanceEntry::FirstInput(_) => ObservationType::FirstInput,
            PerformanceEntry::LargestContentfulPaint(_) => ObservationType::LargestContentfulPaint,
            PerformanceEntry::LayoutShift(_) => ObservationType::LayoutShift,
            PerformanceEntry::LongTask(_) => ObservationType::LongTask,
        }
    }
}

/// 페인트 엔트리 (first-paint / first-contentful-paint)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaintEntry {
    pub name: String,
    pub start_time: f64,
}

/// 첫 입력 엔트리
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FirstInputEntry {
    /// 입력 이벤트 이름 (예: "mousedown")
    #[serde(default)]
    pub name: String,
    pub start_time: f64,
    /// 이벤트 핸들러 처리 시작 시각
    pub processing_start: f64,
    #[serde(default)]
    pub duration: f64,
}

/// 최대 콘텐츠 페인트 엔트리 (반복 발생)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LargestContentfulPaintEntry {
    pub start_time: f64,
    /// 렌더 시각 (교차 출처 이미지 등은 0)
    #[serde(default)]
    pub render_time: f64,
    /// 로드 시각
    #[serde(default)]
    pub load_time: f64,
    /// 요소 면적 (px²)
    #[serde(default)]
    pub size: f64,
}

impl LargestContentfulPaintEntry {
    /// renderTime, loadTime 중 처음으로 0이 아닌 값
    pub fn paint_time(&self) -> f64 {
        if self.render_time != 0.0 {
            self.render_time
        } else {
            self.load_time
        }
    }
}

/// 레이아웃 시프트 엔트리
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutShiftEntry {
    #[serde(default)]
    pub start_time: f64,
    /// 시프트 점수 (단위 없음)
    pub value: f64,
    /// 직전 500ms 내 사용자 입력 여부
    #[serde(default)]
    pub had_recent_input: bool,
}

/// 롱 태스크 엔트리
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LongTaskEntry {
    /// 귀속 태그 ("self", "same-origin-descendant" 등)
    pub name: String,
    pub start_time: f64,
    pub duration: f64,
}

/// 내비게이션 타이밍 엔트리 (세션 시작 시 1회 동기 조회)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NavigationTimingEntry {
    pub redirect_count: u32,
    pub redirect_start: f64,
    pub redirect_end: f64,
    pub fetch_start: f64,
    pub domain_lookup_start: f64,
    pub domain_lookup_end: f64,
    pub connect_start: f64,
    pub connect_end: f64,
    pub request_start: f64,
    pub response_start: f64,
    pub response_end: f64,
    pub worker_start: f64,
    pub dom_content_loaded_event_start: f64,
    pub dom_content_loaded_event_end: f64,
    pub transfer_size: f64,
    pub encoded_body_size: f64,
}

/// 네트워크 연결 정보 (플랫폼이 노출하는 경우에만)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionInfo {
    /// 유효 연결 유형 ("4g", "3g" 등)
    pub effective_type: String,
    /// 하향 대역폭 (Mbps)
    pub downlink: f64,
    /// 왕복 시간 (ms)
    pub rtt: f64,
    /// 데이터 절약 모드
    pub save_data: bool,
}
