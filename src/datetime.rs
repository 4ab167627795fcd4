use chrono::{DateTime, FixedOffset, Months, NaiveDate, Utc};

/// 現在のUTC時刻を取得する。
#[cfg(not(test))]
pub fn now() -> DateTime<Utc> {
    Utc::now()
}


#[cfg(test)]
pub use mock_datetime::now;

/// 指定オフセットでの今日の日付を返す。
pub fn today(offset: &FixedOffset) -> NaiveDate {
    now().with_timezone(offset).date_naive()
}

/// `resume`で遡る期間(今日から1ヶ月前まで)を返す。
///
/// 月末などで1ヶ月前の同日が存在しない場合は、その月の末日に丸められる。
pub fn lookback_month(today: NaiveDate) -> Option<(NaiveDate, NaiveDate)> {
    today
        .checked_sub_months(Months::new(1))
        .map(|since| (since, today))
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, FixedOffset, NaiveDate, SecondsFormat, Utc};
    use rstest::rstest;

    use super::{lookback_month, mock_datetime, today};

    /// 何も設定しない場合は、現在時刻が取得できることを確認する。
    ///
    ///  - ミリ秒まで比較すると失敗し得るため、秒単位で比較している。
    #[test]
    fn test_now_without_mock() {
        mock_datetime::clear_mock_time();
        assert_eq!(
            mock_datetime::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
        );
    }

    #[test]
    fn test_now_with_mock() {
        let datetime = "2024-01-01T00:00:00+00:00";
        mock_datetime::set_mock_time(DateTime::parse_from_rfc3339(datetime).unwrap().to_utc());

        assert_eq!(mock_datetime::now().to_rfc3339(), datetime);
        mock_datetime::clear_mock_time();
    }

    /// UTCでは前日でも、オフセットを適用すると日付が進むことを確認する。
    #[rstest]
    #[case::utc(0, NaiveDate::from_ymd_opt(2024, 3, 9).unwrap())]
    #[case::plus_nine(9, NaiveDate::from_ymd_opt(2024, 3, 10).unwrap())]
    #[case::minus_five(-5, NaiveDate::from_ymd_opt(2024, 3, 9).unwrap())]
    fn test_today_uses_offset(#[case] hours: i32, #[case] expected: NaiveDate) {
        mock_datetime::set_mock_time(
            DateTime::parse_from_rfc3339("2024-03-09T20:00:00Z")
                .unwrap()
                .to_utc(),
        );
        let offset = FixedOffset::east_opt(hours * 3600).unwrap();

        assert_eq!(today(&offset), expected);
        mock_datetime::clear_mock_time();
    }

    #[rstest]
    #[case::mid_month(
        NaiveDate::from_ymd_opt(2024, 5, 15).unwrap(),
        NaiveDate::from_ymd_opt(2024, 4, 15).unwrap(),
    )]
    #[case::year_boundary(
        NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
        NaiveDate::from_ymd_opt(2023, 12, 10).unwrap(),
    )]
    #[case::clamped_to_month_end(
        NaiveDate::from_ymd_opt(2024, 3, 31).unwrap(),
        NaiveDate::from_ymd_opt(2024, 2, 29).unwrap(),
    )]
    fn test_lookback_month(#[case] today: NaiveDate, #[case] since: NaiveDate) {
        assert_eq!(lookback_month(today), Some((since, today)));
    }
}
